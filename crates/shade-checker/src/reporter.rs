//! Diagnostic sink

use crate::CheckError;

/// Receives each diagnostic as the checker finds it, in traversal order
pub trait Reporter {
    fn report(&mut self, error: CheckError);
}

impl Reporter for Vec<CheckError> {
    fn report(&mut self, error: CheckError) {
        self.push(error);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, error: CheckError) {
        (**self).report(error);
    }
}
