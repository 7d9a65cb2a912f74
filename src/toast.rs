/// Seconds a freshly shown toast stays on screen.
pub const TOAST_SECONDS: u32 = 6;

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastType {
    Info,
    Success,
    Warning,
    Error,
}

/// A live notification with its remaining display time.
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastType,
    pub message: String,
    pub closing_in_seconds: u32,
}

/// Holds at most one live toast.
///
/// The countdown is driven externally by calling [`ToastState::tick`] once
/// per second; because the state is a single `Option`, showing a new toast
/// discards the previous one together with its remaining countdown, so two
/// countdowns can never run at once.
#[derive(Debug, Default)]
pub struct ToastState {
    pub current: Option<Toast>,
}

impl ToastState {
    pub fn new() -> ToastState {
        ToastState { current: None }
    }

    /// Shows a toast, replacing any that is already on screen.
    pub fn show(&mut self, kind: ToastType, message: String) {
        self.current = Some(Toast {
            kind,
            message,
            closing_in_seconds: TOAST_SECONDS,
        });
    }

    /// Advances the countdown by one second.
    ///
    /// A toast showing 1 is removed rather than decremented, so 0 is never
    /// displayed.
    pub fn tick(&mut self) {
        if let Some(toast) = &mut self.current {
            if toast.closing_in_seconds <= 1 {
                self.current = None;
            } else {
                toast.closing_in_seconds -= 1;
            }
        }
    }

    /// Removes the toast immediately, regardless of remaining time.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn is_showing(&self) -> bool {
        self.current.is_some()
    }
}
