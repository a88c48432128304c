/// A structural change to the flat row sequence. Ranges are inclusive.
///
/// Every mutation is bracketed: the `AboutTo` variant arrives before the
/// sequence is touched, the completed variant immediately after, so a bound
/// list view knows exactly which rows appeared or disappeared and can
/// animate/redraw around the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowChange {
    AboutToInsert { first: usize, last: usize },
    Inserted { first: usize, last: usize },
    AboutToRemove { first: usize, last: usize },
    Removed { first: usize, last: usize },
}

/// Receiver for row change notifications, supplied to the index at
/// construction. Called synchronously from the mutating operation, on the
/// caller's thread.
pub trait ChangeSink {
    fn on_rows_changed(&mut self, change: RowChange);
}

/// Sink that drops every notification; for indexes without a bound view.
pub struct NullSink;

impl ChangeSink for NullSink {
    fn on_rows_changed(&mut self, _change: RowChange) {}
}

/// Forward notifications into an event loop. A closed channel is ignored:
/// the view is gone, the index may still be in use.
impl ChangeSink for tokio::sync::mpsc::UnboundedSender<RowChange> {
    fn on_rows_changed(&mut self, change: RowChange) {
        let _ = self.send(change);
    }
}

impl ChangeSink for std::sync::mpsc::Sender<RowChange> {
    fn on_rows_changed(&mut self, change: RowChange) {
        let _ = self.send(change);
    }
}
