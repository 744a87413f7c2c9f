//! # Simple Folio
//!
//! The interaction core of a single-page developer portfolio: which section
//! the visitor is reading, the preview dialogs for certifications,
//! achievements and projects, and the project category filter. Rendering is
//! the host's job. This crate holds the state and decides what should change.
//!
//! # Architecture: Events In, Effects Out
//!
//! Every piece of state is a plain struct driven by explicit events and an
//! explicit clock:
//!
//! ```text
//! host window ──scroll/resize──▶ WindowListeners ──▶ Page ──▶ SectionTracker
//! host clicks ──PageEvent──────────────────────────▶ Page ──▶ Gallery ×3, FilterSelector
//!                                                      │
//!                          Effect::ScrollTo ◀──────────┤
//!                          Effect::Probe    ◀──────────┘──▶ ProbeDispatcher (rayon)
//!                                                                │
//!                          PageEvent::ProbeFinished ◀────────────┘
//! ```
//!
//! Nothing in the core reads a clock, starts a timer or touches the DOM.
//! Deadlines are stored as millisecond timestamps and expired by
//! [`page::PageEvent::Tick`]; work only the host can do comes back as
//! [`page::Effect`]s. That keeps every behaviour reproducible in a unit test
//! and lets the `replay` command run a whole visitor session from a script.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`section`] | Active-section tracking and scroll-to-section with a settle window |
//! | [`gallery`] | Generic indexed preview dialog: open, circular prev/next, close grace period |
//! | [`sizing`] | Pure dialog box math from image size, viewport and chrome |
//! | [`filter`] | Category filter over the projects list |
//! | [`probe`] | Image dimension lookup and the background probe dispatcher |
//! | [`listeners`] | Window event registry with drop-scoped subscriptions |
//! | [`page`] | The event loop tying the above together |
//! | [`content`] | `content.toml` loading: gallery items and filter buttons |
//! | [`contact`] | Contact form endpoint contract and mail composition |
//! | [`check`] | Site inventory: probe every image, count filters, find orphans |
//! | [`replay`] | Scripted visitor sessions driven through [`page::Page`] |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`types`] | Shared types: `SectionId`, `Extent`, `Dimensions`, `Viewport` |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## One Gallery, Three Instances
//!
//! Certifications, achievements and projects all open an item in a dialog,
//! step through neighbours with wrap-around, and fade out on close. That
//! behaviour exists once, as [`gallery::Gallery<T>`], generic over anything
//! with an image URI. The page owns three instances that never share state.
//!
//! ## Tickets for Image Probes
//!
//! An image's natural size is only known once its header has been read, and
//! that happens off the event loop. A visitor clicking "next" quickly can
//! have several probes in flight. Each request carries a
//! [`gallery::Ticket`] and the gallery accepts only the newest one, so the
//! dimensions on screen always belong to the item on screen.
//!
//! ## Literal Section Boundaries
//!
//! A section is active when `top <= scroll_y + fixed_offset < top + height`,
//! first match in document order. When nothing matches the previous answer
//! stands. There is always exactly one active section.
//!
//! ## Scoped Listeners
//!
//! Window listeners are registered through [`listeners::WindowListeners`],
//! which returns a [`listeners::Subscription`]. Dropping the subscription
//! detaches the listener, so a torn-down page cannot keep receiving scroll
//! events.

pub mod check;
pub mod config;
pub mod contact;
pub mod content;
pub mod filter;
pub mod gallery;
pub mod listeners;
pub mod output;
pub mod page;
pub mod probe;
pub mod replay;
pub mod section;
pub mod sizing;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
