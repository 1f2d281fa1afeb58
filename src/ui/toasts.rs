//! Transient messages stacked in the bottom-right corner.

use egui::{Align2, Context, RichText};

use crate::ui::theme;

const INFO_SECONDS: f64 = 3.0;
const ERROR_SECONDS: f64 = 6.0;
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    /// Expiry in egui input time (seconds).
    pub expires_at: f64,
}

#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn info(&mut self, message: impl Into<String>, now: f64) {
        self.push(ToastKind::Info, message.into(), now + INFO_SECONDS);
    }

    pub fn error(&mut self, message: impl Into<String>, now: f64) {
        self.push(ToastKind::Error, message.into(), now + ERROR_SECONDS);
    }

    fn push(&mut self, kind: ToastKind, message: String, expires_at: f64) {
        // The same text twice in a row just extends the first one.
        if let Some(last) = self.items.last_mut() {
            if last.kind == kind && last.message == message {
                last.expires_at = expires_at;
                return;
            }
        }
        self.items.push(Toast {
            kind,
            message,
            expires_at,
        });
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: f64) {
        self.items.retain(|t| t.expires_at > now);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn show(&mut self, ctx: &Context) {
        let now = ctx.input(|i| i.time);
        self.prune(now);
        if self.items.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -(theme::STATUS_BAR_HEIGHT + 12.0)])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (idx, toast) in self.items.iter().enumerate() {
                    let (icon, stripe) = match toast.kind {
                        ToastKind::Info => (egui_phosphor::regular::INFO, theme::ACCENT),
                        ToastKind::Error => (egui_phosphor::regular::WARNING, theme::DANGER),
                    };
                    let frame = egui::Frame::default()
                        .fill(theme::BG_HEADER)
                        .stroke(egui::Stroke::new(1.0, stripe))
                        .rounding(egui::Rounding::same(6.0))
                        .inner_margin(egui::Margin::symmetric(10.0, 6.0));
                    let resp = frame
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(icon).color(stripe));
                                ui.label(RichText::new(&toast.message).size(12.0).color(theme::TEXT_PRIMARY));
                            });
                        })
                        .response
                        .interact(egui::Sense::click());
                    if resp.clicked() {
                        dismissed = Some(idx);
                    }
                    ui.add_space(4.0);
                }
            });
        if let Some(idx) = dismissed {
            self.items.remove(idx);
        }

        // Keep repainting so expiry happens without input.
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire() {
        let mut toasts = Toasts::default();
        toasts.info("saved", 0.0);
        toasts.error("failed", 0.0);

        toasts.prune(INFO_SECONDS + 0.1);
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].kind, ToastKind::Error);

        toasts.prune(ERROR_SECONDS + 0.1);
        assert!(toasts.is_empty());
    }

    #[test]
    fn repeated_message_is_shown_once() {
        let mut toasts = Toasts::default();
        toasts.error("Could not move task", 0.0);
        toasts.error("Could not move task", 2.0);
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].expires_at, 2.0 + ERROR_SECONDS);
    }

    #[test]
    fn oldest_toast_is_dropped_past_the_limit() {
        let mut toasts = Toasts::default();
        for i in 0..=MAX_VISIBLE {
            toasts.info(format!("message {i}"), 0.0);
        }
        assert_eq!(toasts.items().len(), MAX_VISIBLE);
        assert_eq!(toasts.items()[0].message, "message 1");
    }
}
