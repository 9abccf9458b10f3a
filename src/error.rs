pub type VatResult<T> = Result<T, VatError>;

#[derive(thiserror::Error, Debug)]
pub enum VatError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("host operation error: {0}")]
    Host(String),

    #[error("io error: {0}")]
    Io(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VatError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            VatError::config("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            VatError::host("x")
                .to_string()
                .contains("host operation error:")
        );
        assert!(VatError::io("x").to_string().contains("io error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = VatError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
