/// Finalized curves in insertion order. Append-only; the kernel objects are
/// released when the store drops with the session.
#[derive(Debug)]
pub struct CurveStore<C> {
    curves: Vec<C>,
}

impl<C> Default for CurveStore<C> {
    fn default() -> Self {
        Self { curves: Vec::new() }
    }
}

impl<C> CurveStore<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, curve: C) {
        self.curves.push(curve);
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.curves.iter()
    }

    pub fn as_slice(&self) -> &[C] {
        &self.curves
    }
}

impl<'a, C> IntoIterator for &'a CurveStore<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
