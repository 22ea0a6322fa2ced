//! Last-error slot for the status-code boundary.
//!
//! One slot per thread. A failing boundary call overwrites it, a succeeding
//! one clears it back to [`ErrorCode::Ok`] with an empty message. There is no
//! queue: read it right after the failing call, before making another one on
//! the same thread.

use std::cell::RefCell;

use crate::utils::errors::ErrorCode;

/// Upper bound on the stored message, in bytes.
pub const MAX_MESSAGE_LEN: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastError {
    pub code: ErrorCode,
    pub message: String,
}

thread_local! {
    static LAST_ERROR: RefCell<LastError> = RefCell::new(LastError::default());
}

pub fn set_error(code: ErrorCode, message: &str) {
    let message = bounded(message);
    LAST_ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        slot.code = code;
        slot.message.clear();
        slot.message.push_str(message);
    });
}

pub fn clear() {
    set_error(ErrorCode::Ok, "");
}

/// Reads the slot without clearing it.
pub fn get_last_error() -> LastError {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

pub fn last_error_code() -> ErrorCode {
    LAST_ERROR.with(|slot| slot.borrow().code)
}

pub fn last_error_message() -> String {
    LAST_ERROR.with(|slot| slot.borrow().message.clone())
}

fn bounded(message: &str) -> &str {
    if message.len() <= MAX_MESSAGE_LEN {
        return message;
    }

    let mut end = MAX_MESSAGE_LEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_and_clear() {
        clear();
        assert_eq!(get_last_error(), LastError::default());

        set_error(ErrorCode::Io, "first");
        set_error(ErrorCode::Format, "second");
        assert_eq!(last_error_code(), ErrorCode::Format);
        assert_eq!(last_error_message(), "second");

        // reading does not consume
        assert_eq!(last_error_message(), "second");

        clear();
        assert_eq!(last_error_code(), ErrorCode::Ok);
        assert!(last_error_message().is_empty());
    }

    #[test]
    fn message_is_bounded_on_char_boundary() {
        let long = "é".repeat(MAX_MESSAGE_LEN);
        set_error(ErrorCode::Internal, &long);

        let stored = last_error_message();
        assert!(stored.len() <= MAX_MESSAGE_LEN);
        assert!(stored.chars().all(|c| c == 'é'));
        assert_eq!(stored.len(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn slot_is_per_thread() {
        set_error(ErrorCode::Format, "main thread");

        std::thread::spawn(|| {
            assert_eq!(last_error_code(), ErrorCode::Ok);
            set_error(ErrorCode::Io, "worker thread");
        })
        .join()
        .unwrap();

        assert_eq!(last_error_code(), ErrorCode::Format);
        assert_eq!(last_error_message(), "main thread");
    }
}
