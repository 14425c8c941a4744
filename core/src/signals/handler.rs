use super::signal::InputSignal;

/// Trait for systems that react to input signals.
/// Implement this for status publishing, action dispatch, diagnostics, etc.
pub trait SignalHandler {
    /// Handle a single signal.
    fn handle_signal(&mut self, signal: &InputSignal);

    /// Handle multiple signals (default implementation calls handle_signal for each)
    fn handle_signals(&mut self, signals: &[InputSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}
