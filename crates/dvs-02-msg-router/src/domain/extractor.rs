//! Custom result extractors.
//!
//! An extractor derives auxiliary data and a digest from a handler's output
//! message. The digest is what validators sign over, so it is usually a hash
//! of a canonical projection of the output.

use crate::domain::errors::ExtractorError;
use shared_types::{AnyMessage, DomainMessage};
use std::marker::PhantomData;

/// Typed extractor for output messages of type `M`.
pub trait ResultExtractor<M: DomainMessage>: Send + Sync + 'static {
    fn get_data(&self, msg: &M) -> Result<Vec<u8>, ExtractorError>;

    fn get_digest(&self, msg: &M) -> Result<Vec<u8>, ExtractorError>;
}

/// Extractor over a packed output message.
pub trait ErasedExtractor: Send + Sync {
    fn get_data(&self, msg: &AnyMessage) -> Result<Vec<u8>, ExtractorError>;

    fn get_digest(&self, msg: &AnyMessage) -> Result<Vec<u8>, ExtractorError>;
}

/// Adapter from a typed extractor to an erased one.
pub(crate) struct Typed<M, E> {
    inner: E,
    _marker: PhantomData<fn() -> M>,
}

impl<M, E> Typed<M, E> {
    pub(crate) fn new(inner: E) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<M, E> ErasedExtractor for Typed<M, E>
where
    M: DomainMessage,
    E: ResultExtractor<M>,
{
    fn get_data(&self, msg: &AnyMessage) -> Result<Vec<u8>, ExtractorError> {
        self.inner.get_data(&msg.unpack::<M>()?)
    }

    fn get_digest(&self, msg: &AnyMessage) -> Result<Vec<u8>, ExtractorError> {
        self.inner.get_digest(&msg.unpack::<M>()?)
    }
}
