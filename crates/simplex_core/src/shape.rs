/// A named output channel of the solver.
///
/// The solver's output vector is indexed by [`Shape::index`]; index 0 is
/// the rest shape and receives `1 - max activation` after every solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: String,
    pub index: usize,
}

impl Shape {
    #[must_use]
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.index == 0
    }
}
