use crate::core::data::viewport::Viewport;

/// Previously visited viewports, most recent last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportHistory {
    stack: Vec<Viewport>,
}

impl ViewportHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, viewport: Viewport) {
        self.stack.push(viewport);
    }

    pub fn pop(&mut self) -> Option<Viewport> {
        self.stack.pop()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Viewport> {
        self.stack.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let mut history = ViewportHistory::new();

        assert!(history.is_empty());
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn test_pops_in_reverse_push_order() {
        let first = Viewport::DEFAULT;
        let second = Viewport::new(-1.0, -0.5, 1.0, 1.0).unwrap();
        let mut history = ViewportHistory::new();

        history.push(first);
        history.push(second);

        assert_eq!(history.len(), 2);
        assert_eq!(history.peek(), Some(&second));
        assert_eq!(history.pop(), Some(second));
        assert_eq!(history.pop(), Some(first));
        assert!(history.is_empty());
    }
}
