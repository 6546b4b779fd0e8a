//! Browser timer for the deferred return to READY

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::exercise::ReturnTicket;

/// Errors that can occur while arming a timer
#[derive(Debug)]
pub enum TimerError {
    NoWindow,
    SetTimeout(JsValue),
}

struct ArmedTimer {
    ticket: ReturnTicket,
    handle: i32,
    callback: Closure<dyn FnMut()>,
}

/// At most one `setTimeout` in flight, tagged with the ticket it redeems
#[derive(Default)]
pub(crate) struct ReturnTimer {
    armed: Option<ArmedTimer>,
    /// Closure that already ran. It is freed on the next arm/cancel, never
    /// from inside its own invocation.
    spent: Option<Closure<dyn FnMut()>>,
}

impl ReturnTimer {
    pub fn arm(
        &mut self,
        ticket: ReturnTicket,
        delay_ms: u32,
        callback: Closure<dyn FnMut()>,
    ) -> Result<(), TimerError> {
        self.cancel_all();

        let window = web_sys::window().ok_or(TimerError::NoWindow)?;
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            )
            .map_err(TimerError::SetTimeout)?;

        self.armed = Some(ArmedTimer {
            ticket,
            handle,
            callback,
        });
        Ok(())
    }

    /// Clear the timer if it still holds `ticket`
    pub fn cancel(&mut self, ticket: ReturnTicket) {
        if self.armed.as_ref().is_some_and(|t| t.ticket == ticket) {
            self.cancel_all();
        }
    }

    pub fn cancel_all(&mut self) {
        self.spent = None;
        if let Some(armed) = self.armed.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(armed.handle);
            }
            log::debug!("Cancelled return timer #{}", armed.ticket.generation());
        }
    }

    /// Called from inside the fired callback
    pub fn retire(&mut self, ticket: ReturnTicket) {
        if self.armed.as_ref().is_some_and(|t| t.ticket == ticket) {
            self.spent = self.armed.take().map(|t| t.callback);
        }
    }
}
