//! Help-surface coordinator.
//!
//! Decides which of the two help surfaces is visible: the autocomplete
//! dropdown while the visitor types, or the suggestion chips while the input
//! is empty. At most one of them is ever visible. Entering either surface
//! tears the other one down first (content, pending timer and selection).
//!
//! The coordinator owns no timers or tasks. Every transition returns the
//! side effects it needs as [`SurfaceEffect`] values and the caller carries
//! them out.

use crate::autocomplete::AutocompleteQuery;
use crate::config::{StaleAutocompletePolicy, SurfaceTimings};
use crate::suggestion::{UsedSuggestions, select_for_display};
use crate::timer::TimerName;
use std::time::Duration;

/// The currently visible help surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HelpSurface {
    #[default]
    Idle,
    Autocomplete(AutocompleteQuery),
    Suggestions(Vec<String>),
}

impl HelpSurface {
    pub fn is_idle(&self) -> bool {
        matches!(self, HelpSurface::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFlags {
    pub suggestions_shown: bool,
    pub prevent_suggestions: bool,
    pub is_minimized: bool,
    pub is_fullscreen: bool,
    pub settings_open: bool,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEffect {
    Schedule { timer: TimerName, delay: Duration },
    Cancel(TimerName),
    ResolveAutocomplete { request_id: u64, query: String },
    FocusInput,
}

/// Result of a transition: effects to run and, for selections, the text
/// that was placed into the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    pub effects: Vec<SurfaceEffect>,
    pub selected: Option<String>,
}

impl Transition {
    fn push(&mut self, effect: SurfaceEffect) {
        self.effects.push(effect);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Tab,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealReason {
    InputCleared,
    AfterSend,
}

pub struct HelpSurfaceCoordinator {
    input: String,
    surface: HelpSurface,
    flags: SessionFlags,
    used: UsedSuggestions,
    pool: Vec<String>,
    pending_reveal: Option<RevealReason>,
    latest_request_id: u64,
    timings: SurfaceTimings,
    stale_policy: StaleAutocompletePolicy,
}

impl HelpSurfaceCoordinator {
    pub fn new(timings: SurfaceTimings, stale_policy: StaleAutocompletePolicy) -> Self {
        Self {
            input: String::new(),
            surface: HelpSurface::Idle,
            flags: SessionFlags::default(),
            used: UsedSuggestions::new(),
            pool: Vec::new(),
            pending_reveal: None,
            latest_request_id: 0,
            timings,
            stale_policy,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn surface(&self) -> &HelpSurface {
        &self.surface
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn used(&self) -> &UsedSuggestions {
        &self.used
    }

    /// The candidate list chips are drawn from.
    pub fn suggestion_pool(&self) -> &[String] {
        &self.pool
    }

    pub fn visible_chips(&self) -> Option<&[String]> {
        match &self.surface {
            HelpSurface::Suggestions(chips) => Some(chips),
            _ => None,
        }
    }

    pub fn autocomplete(&self) -> Option<&AutocompleteQuery> {
        match &self.surface {
            HelpSurface::Autocomplete(query) => Some(query),
            _ => None,
        }
    }

    fn input_is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }

    fn may_reveal_chips(&self) -> bool {
        self.input_is_empty() && !self.flags.prevent_suggestions && !self.flags.is_minimized
    }

    // ============================================================================
    // Surface primitives
    // ============================================================================

    fn dismiss_autocomplete(&mut self) {
        if matches!(self.surface, HelpSurface::Autocomplete(_)) {
            self.surface = HelpSurface::Idle;
        }
    }

    fn tear_down_autocomplete(&mut self, t: &mut Transition) {
        self.dismiss_autocomplete();
        t.push(SurfaceEffect::Cancel(TimerName::Autocomplete));
    }

    fn tear_down_suggestions(&mut self, t: &mut Transition) {
        if matches!(self.surface, HelpSurface::Suggestions(_)) {
            self.surface = HelpSurface::Idle;
        }
        self.flags.suggestions_shown = false;
        self.pending_reveal = None;
        t.push(SurfaceEffect::Cancel(TimerName::Suggestions));
    }

    fn show_suggestions(&mut self, t: &mut Transition) {
        let chips = select_for_display(&self.pool, &self.used);
        self.tear_down_suggestions(t);
        if chips.is_empty() {
            return;
        }
        self.tear_down_autocomplete(t);
        self.surface = HelpSurface::Suggestions(chips);
        self.flags.suggestions_shown = true;
    }

    fn force_idle(&mut self, t: &mut Transition) {
        self.tear_down_autocomplete(t);
        self.tear_down_suggestions(t);
    }

    // ============================================================================
    // Input events
    // ============================================================================

    /// The input value changed through typing.
    pub fn on_input(&mut self, value: &str) -> Transition {
        let mut t = Transition::default();
        self.input = value.to_string();

        if self.input_is_empty() {
            self.tear_down_autocomplete(&mut t);
            self.flags.prevent_suggestions = false;
            self.pending_reveal = Some(RevealReason::InputCleared);
            t.push(SurfaceEffect::Schedule {
                timer: TimerName::Suggestions,
                delay: self.timings.suggestions_reveal,
            });
        } else {
            self.tear_down_suggestions(&mut t);
            self.flags.prevent_suggestions = true;
            t.push(SurfaceEffect::Schedule {
                timer: TimerName::Autocomplete,
                delay: self.timings.autocomplete_debounce,
            });
        }
        t
    }

    /// A timer armed by an earlier transition elapsed.
    pub fn on_timer(&mut self, timer: TimerName) -> Transition {
        let mut t = Transition::default();
        match timer {
            TimerName::Autocomplete => {
                if self.input_is_empty() {
                    self.dismiss_autocomplete();
                    return t;
                }
                self.latest_request_id += 1;
                t.push(SurfaceEffect::ResolveAutocomplete {
                    request_id: self.latest_request_id,
                    query: self.input.clone(),
                });
            }
            TimerName::Suggestions => {
                if self.pending_reveal.take() == Some(RevealReason::AfterSend) {
                    self.flags.prevent_suggestions = false;
                }
                if self.may_reveal_chips() {
                    self.show_suggestions(&mut t);
                }
            }
        }
        t
    }

    /// An autocomplete resolution finished. Empty `items` means "hide".
    pub fn on_autocomplete_resolved(&mut self, request_id: u64, items: Vec<String>) -> Transition {
        let mut t = Transition::default();

        if self.stale_policy == StaleAutocompletePolicy::Discard
            && (request_id != self.latest_request_id || self.input_is_empty())
        {
            tracing::debug!(
                request_id,
                latest = self.latest_request_id,
                "discarding stale autocomplete resolution"
            );
            return t;
        }

        if items.is_empty() {
            self.dismiss_autocomplete();
            return t;
        }

        self.tear_down_suggestions(&mut t);
        self.surface = HelpSurface::Autocomplete(AutocompleteQuery::new(self.input.clone(), items));
        t
    }

    /// Keyboard handling while a help surface may be visible.
    ///
    /// Returns `None` when the key is not consumed, e.g. Enter without a
    /// highlighted completion, which the host treats as "send".
    pub fn on_key(&mut self, key: NavKey) -> Option<Transition> {
        if key == NavKey::Escape {
            let mut t = Transition::default();
            self.force_idle(&mut t);
            return Some(t);
        }

        let HelpSurface::Autocomplete(query) = &mut self.surface else {
            return None;
        };

        match key {
            NavKey::Down => {
                query.highlight_next();
                Some(Transition::default())
            }
            NavKey::Up => {
                query.highlight_prev();
                Some(Transition::default())
            }
            NavKey::Enter => {
                let index = query.highlight?;
                self.select_autocomplete(index)
            }
            NavKey::Tab => {
                let index = query.highlight.unwrap_or(0);
                self.select_autocomplete(index)
            }
            NavKey::Escape => None,
        }
    }

    // ============================================================================
    // Selections
    // ============================================================================

    fn apply_selection(&mut self, text: String) -> Transition {
        let mut t = Transition::default();
        self.force_idle(&mut t);
        self.input = text.clone();
        self.flags.prevent_suggestions = true;
        self.used.record(&text);
        t.push(SurfaceEffect::FocusInput);
        t.selected = Some(text);
        t
    }

    /// Picks a completion by index (click, Enter or Tab).
    pub fn select_autocomplete(&mut self, index: usize) -> Option<Transition> {
        let text = self.autocomplete()?.items.get(index)?.clone();
        Some(self.apply_selection(text))
    }

    /// Picks a visible suggestion chip by index.
    pub fn select_chip(&mut self, index: usize) -> Option<Transition> {
        let text = self.visible_chips()?.get(index)?.clone();
        self.flags.settings_open = false;
        Some(self.apply_selection(text))
    }

    /// Picks an FAQ entry; behaves like a chip click.
    pub fn select_faq(&mut self, question: &str) -> Transition {
        self.flags.settings_open = false;
        self.apply_selection(question.to_string())
    }

    // ============================================================================
    // Conversation hooks
    // ============================================================================

    /// A message was submitted: input is cleared, both surfaces hide, and
    /// chips may come back after the resume delay.
    pub fn on_message_sent(&mut self) -> Transition {
        let mut t = Transition::default();
        self.input.clear();
        self.force_idle(&mut t);
        self.flags.prevent_suggestions = true;
        self.pending_reveal = Some(RevealReason::AfterSend);
        t.push(SurfaceEffect::Schedule {
            timer: TimerName::Suggestions,
            delay: self.timings.suggestions_resume,
        });
        t
    }

    /// Replaces the chip pool (greeting or fallback content) and reveals it
    /// when the input is empty.
    pub fn seed_suggestions(&mut self, suggestions: Vec<String>) -> Transition {
        let mut t = Transition::default();
        self.pool = suggestions;
        if self.may_reveal_chips() {
            self.show_suggestions(&mut t);
        }
        t
    }

    /// Follow-on suggestions attached to an answer. Ignored when empty; only
    /// rendered if the input is still empty right now.
    pub fn adopt_server_suggestions(&mut self, suggestions: Vec<String>) -> Transition {
        if suggestions.is_empty() {
            return Transition::default();
        }
        self.seed_suggestions(suggestions)
    }

    // ============================================================================
    // Window state
    // ============================================================================

    pub fn minimize(&mut self) -> Transition {
        let mut t = Transition::default();
        self.flags.is_minimized = true;
        self.force_idle(&mut t);
        t
    }

    pub fn restore(&mut self) -> Transition {
        let mut t = Transition::default();
        self.flags.is_minimized = false;
        if self.may_reveal_chips() {
            self.show_suggestions(&mut t);
        }
        t
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.flags.is_fullscreen = !self.flags.is_fullscreen;
        self.flags.is_fullscreen
    }

    pub fn open_settings(&mut self) {
        self.flags.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.flags.settings_open = false;
    }
}
