use std::any::Any;

/// Notified by [`super::Solver`] whenever a slot is observed. Purely
/// additive diagnostics; attaching a subscriber does not change solver
/// semantics.
pub trait Subscriber: Any {
    /// Called once per [`super::Solver::reset`]. No-op by default; override
    /// to clear retained state.
    fn on_generation_start(&mut self) {}

    /// Called when `slot` is collapsed to `tile`.
    fn on_collapse(&mut self, slot: usize, tile: usize);

    /// Retrieves the concrete subscriber type back out of a `Box<dyn Subscriber>`.
    fn as_any(&self) -> &dyn Any;
}

/// Prints every collapse to stdout. Useful for debugging a specific seed
/// without attaching a debugger.
#[derive(Debug, Default)]
pub struct DebugSubscriber;

impl Subscriber for DebugSubscriber {
    fn on_collapse(&mut self, slot: usize, tile: usize) {
        println!("collapsed slot {slot} to tile {tile}");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Collects the full `(slot, tile)` sequence of a generation, in
/// observation order. Cleared at the start of every generation.
#[derive(Debug, Clone, Default)]
pub struct CollapseHistorySubscriber {
    history: Vec<(usize, usize)>,
}

impl CollapseHistorySubscriber {
    pub fn history(&self) -> &[(usize, usize)] {
        &self.history
    }
}

impl Subscriber for CollapseHistorySubscriber {
    fn on_generation_start(&mut self) {
        self.history.clear();
    }

    fn on_collapse(&mut self, slot: usize, tile: usize) {
        self.history.push((slot, tile));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_subscriber_records_in_order() {
        let mut subscriber = CollapseHistorySubscriber::default();
        subscriber.on_generation_start();
        subscriber.on_collapse(0, 3);
        subscriber.on_collapse(1, 2);
        assert_eq!(subscriber.history(), &[(0, 3), (1, 2)]);
    }

    #[test]
    fn history_clears_on_new_generation() {
        let mut subscriber = CollapseHistorySubscriber::default();
        subscriber.on_collapse(0, 1);
        subscriber.on_generation_start();
        assert!(subscriber.history().is_empty());
    }
}
