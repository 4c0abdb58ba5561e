//! Scoped ownership of an open document.

use std::ops::{Deref, DerefMut};

use super::DocumentSource;

/// Owns a [`DocumentSource`] and closes it exactly once when dropped.
///
/// Extraction holds the guard for the duration of the call, so the engine's
/// handle is released on success, on error and during unwinding alike.
pub struct DocumentGuard<D: DocumentSource> {
    inner: D,
    closed: bool,
}

impl<D: DocumentSource> DocumentGuard<D> {
    /// Take ownership of an open document.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Close the document now instead of at scope exit.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.inner.close();
            log::trace!("document handle released");
        }
    }
}

impl<D: DocumentSource> Deref for DocumentGuard<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.inner
    }
}

impl<D: DocumentSource> DerefMut for DocumentGuard<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.inner
    }
}

impl<D: DocumentSource> Drop for DocumentGuard<D> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::PageSource;
    use crate::error::{Error, Result};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingDoc {
        closes: Rc<Cell<usize>>,
    }

    impl DocumentSource for CountingDoc {
        fn page_count(&self) -> usize {
            0
        }

        fn page(&self, index: usize) -> Result<Box<dyn PageSource + '_>> {
            Err(Error::PageOutOfRange(index, 0))
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    #[test]
    fn test_closes_on_drop() {
        let closes = Rc::new(Cell::new(0));
        {
            let guard = DocumentGuard::new(CountingDoc {
                closes: closes.clone(),
            });
            assert_eq!(guard.page_count(), 0);
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_explicit_close_is_not_repeated() {
        let closes = Rc::new(Cell::new(0));
        let guard = DocumentGuard::new(CountingDoc {
            closes: closes.clone(),
        });
        guard.close();
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_closes_during_unwind() {
        let closes = Rc::new(Cell::new(0));
        let inner = closes.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = DocumentGuard::new(CountingDoc { closes: inner });
            panic!("extraction blew up");
        }));
        assert!(result.is_err());
        assert_eq!(closes.get(), 1);
    }
}
