//! Study Bridge Library Crate
//!
//! Everything behind the `study-bridge` binary: configuration loading, the
//! line-delimited JSON protocol spoken with the host process, the bridge loop
//! itself, and the interactive study console. The binary is a thin wrapper
//! around this library.

pub mod bridge;
pub mod config;
pub mod protocol;
pub mod study;

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use mockall::mock;
    use study_core::{ModelClient, ModelError};

    mock! {
        pub Model {}

        #[async_trait]
        impl ModelClient for Model {
            async fn ask(&self, prompt: &str) -> Result<String, ModelError>;
        }
    }
}
