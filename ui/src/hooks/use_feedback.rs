use std::time::Duration;

use dioxus::prelude::*;

use crate::compat;
use crate::send_flow::Feedback;
use crate::send_form::Notice;

/// How long a toast stays up.
pub const TOAST_DURATION: Duration = Duration::from_millis(5000);
/// The loading overlay never outlives this, even if no response arrives.
pub const LOADING_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Clone, Debug, PartialEq)]
pub struct ShownToast {
    pub id: u64,
    pub notice: Notice,
}

/// The loading overlay. Every `show` starts a new generation, and its
/// timeout may only hide that generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadingSlot {
    generation: u64,
    visible: bool,
}

impl LoadingSlot {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows the overlay and returns the generation its timeout must name.
    pub fn show(&mut self) -> u64 {
        self.generation += 1;
        self.visible = true;
        self.generation
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Timeout of the show that returned `generation`.
    pub fn expire(&mut self, generation: u64) {
        if self.generation == generation {
            self.visible = false;
        }
    }
}

/// Toast and loading state of one screen, backed by signals.
#[derive(Clone, Copy)]
pub struct ScreenFeedback {
    toast: Signal<Option<ShownToast>>,
    next_toast_id: Signal<u64>,
    loading: Signal<LoadingSlot>,
}

impl ScreenFeedback {
    /// The toast to render, if any. Subscribes the caller.
    pub fn current_toast(&self) -> Option<ShownToast> {
        self.toast.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.read().is_visible()
    }
}

impl Feedback for ScreenFeedback {
    fn toast(&mut self, notice: Notice) {
        let id = *self.next_toast_id.peek();
        self.next_toast_id.set(id + 1);
        self.toast.set(Some(ShownToast { id, notice }));

        // A newer toast replaces this one and owns the slot from then on.
        let mut toast = self.toast;
        spawn(async move {
            compat::sleep(TOAST_DURATION).await;
            if toast.peek().as_ref().map(|t| t.id) == Some(id) {
                toast.set(None);
            }
        });
    }

    fn show_loading(&mut self) {
        let generation = self.loading.with_mut(LoadingSlot::show);
        let mut loading = self.loading;
        spawn(async move {
            compat::sleep(LOADING_TIMEOUT).await;
            loading.with_mut(|slot| slot.expire(generation));
        });
    }

    fn hide_loading(&mut self) {
        self.loading.with_mut(LoadingSlot::hide);
    }
}

pub fn use_feedback() -> ScreenFeedback {
    let toast = use_signal(|| None);
    let next_toast_id = use_signal(|| 0);
    let loading = use_signal(LoadingSlot::default);
    ScreenFeedback {
        toast,
        next_toast_id,
        loading,
    }
}
