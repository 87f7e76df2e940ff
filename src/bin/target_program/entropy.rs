use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

pub const BUFFER_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("{0}")]
    Unavailable(#[from] rand::Error),
    #[error("requested length must be positive")]
    ZeroLength,
}

pub trait EntropySource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system's generator (getrandom on Linux).
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(buf)?;
        Ok(())
    }
}

pub fn generate<S: EntropySource>(source: &mut S, length: usize) -> Result<Vec<u8>, EntropyError> {
    if length == 0 {
        return Err(EntropyError::ZeroLength);
    }
    let mut buf = vec![0u8; length];
    source.fill(&mut buf)?;
    Ok(buf)
}

/// Sixteen bytes drawn once at startup. Never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomBuffer([u8; BUFFER_LEN]);

impl RandomBuffer {
    pub fn generate<S: EntropySource>(source: &mut S) -> Result<Self, EntropyError> {
        let mut bytes = [0u8; BUFFER_LEN];
        bytes.copy_from_slice(&generate(source, BUFFER_LEN)?);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.0
    }
}
