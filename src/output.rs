//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every gallery item is
//! shown by its positional index and title first; the image URI and its probe
//! result follow as indented context lines. This reads as a content inventory
//! while still letting users trace a line back to a file under `public/`.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Certifications (2 items)
//!     001 AWS Certified Solutions Architect
//!         Image: /images/aws.png (1200x900)
//!     002 Google Cloud Professional
//!         Image: /images/gcp.png (missing)
//!
//! Filters
//!     All (all): 6 projects
//!     Web (web): 3 projects
//!
//! Unreferenced images
//!     images/old-logo.png
//!
//! Checked 9 images, 1 failed
//! ```
//!
//! ## Replay
//!
//! ```text
//! [   100ms] nav certifications
//!     → scroll to 1520 (smooth)
//!     Section: certifications (tracking paused, header elevated)
//!     certifications: 001 AWS Certified (loading)
//!         Dialog: 848x760 for 800x600
//! ```
//!
//! ## Contact
//!
//! ```text
//! 200 Message sent successfully
//! Mail
//!     From: Portfolio <no-reply@example.com>
//!     Subject: New Contact Form Submission: Hello
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::check::CheckReport;
use crate::contact::{ContactReply, OutgoingMail};
use crate::content::GalleryKind;
use crate::page::{Effect, GallerySnapshot};
use crate::replay::ReplayStep;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Gallery heading with its item count.
///
/// ```text
/// Certifications (2 items)
/// Achievements (1 item)
/// ```
fn gallery_header(kind: GalleryKind, count: usize) -> String {
    let name = match kind {
        GalleryKind::Certifications => "Certifications",
        GalleryKind::Achievements => "Achievements",
        GalleryKind::Projects => "Projects",
    };
    let noun = if count == 1 { "item" } else { "items" };
    format!("{} ({} {})", name, count, noun)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the site inventory produced by [`crate::check::check_site`].
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();

    for kind in GalleryKind::ALL {
        let items: Vec<_> = report.images.iter().filter(|i| i.gallery == kind).collect();
        if items.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(gallery_header(kind, items.len()));
        for item in items {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                format_index(item.index + 1),
                truncate_desc(&item.title, 60)
            ));
            let status = match &item.result {
                Ok(dims) => dims.to_string(),
                Err(crate::probe::ProbeError::NotFound(_)) => "missing".to_string(),
                Err(e) => e.to_string(),
            };
            lines.push(format!("{}Image: {} ({})", indent(2), item.uri, status));
        }
    }

    if !report.filters.is_empty() {
        lines.push(String::new());
        lines.push("Filters".to_string());
        for f in &report.filters {
            lines.push(format!(
                "{}{} ({}): {}",
                indent(1),
                f.option.label,
                f.option.value,
                plural(f.matches, "project", "projects")
            ));
        }
    }

    if !report.unreferenced.is_empty() {
        lines.push(String::new());
        lines.push("Unreferenced images".to_string());
        for path in &report.unreferenced {
            lines.push(format!("{}{}", indent(1), path));
        }
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for w in &report.warnings {
            lines.push(format!("{}{}", indent(1), w));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {}, {} failed",
        plural(report.images.len(), "image", "images"),
        report.failed()
    ));

    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// replay
// ============================================================================

/// Format one replayed step: the action, what it asked the host to do, and
/// the resulting page state.
pub fn format_replay_step(step: &ReplayStep) -> Vec<String> {
    let mut lines = vec![format!("[{:>6}ms] {}", step.at, step.action)];

    for effect in &step.effects {
        lines.push(match effect {
            Effect::ScrollTo(cmd) => format!(
                "{}\u{2192} scroll to {}{}",
                indent(1),
                cmd.top,
                if cmd.smooth { " (smooth)" } else { "" }
            ),
            Effect::Probe { gallery, request } => {
                format!("{}\u{2192} probe {} for {}", indent(1), request.uri, gallery)
            }
        });
    }

    let snap = &step.snapshot;
    let mut flags = Vec::new();
    if snap.tracking_suspended {
        flags.push("tracking paused");
    }
    if snap.header_elevated {
        flags.push("header elevated");
    }
    if snap.menu_open {
        flags.push("menu open");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };
    lines.push(format!("{}Section: {}{}", indent(1), snap.active_section, flags));

    if snap.filter != crate::filter::ALL {
        lines.push(format!(
            "{}Filter: {} ({})",
            indent(1),
            snap.filter,
            plural(snap.visible_projects.len(), "project", "projects")
        ));
    }

    for gallery in &snap.galleries {
        lines.extend(format_gallery_state(gallery));
    }

    lines
}

fn format_gallery_state(gallery: &GallerySnapshot) -> Vec<String> {
    let Some(index) = gallery.state.open_index else {
        return Vec::new();
    };
    let status = if !gallery.state.visible {
        " (closing)"
    } else if gallery.state.loading {
        " (loading)"
    } else {
        ""
    };
    let mut lines = vec![format!(
        "{}{}: {} {}{}",
        indent(1),
        gallery.kind,
        format_index(index + 1),
        gallery.title.as_deref().unwrap_or("?"),
        status
    )];
    if let Some(dialog) = gallery.dialog {
        lines.push(format!(
            "{}Dialog: {}x{} for {}",
            indent(2),
            dialog.width,
            dialog.height,
            gallery.state.dimensions
        ));
    }
    lines
}

/// Print every replayed step, blank-line separated.
pub fn print_replay_output(steps: &[ReplayStep]) {
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in format_replay_step(step) {
            println!("{}", line);
        }
    }
}

// ============================================================================
// contact
// ============================================================================

/// Format a contact endpoint reply, plus the mail it produced if any.
pub fn format_contact_output(reply: &ContactReply, mail: Option<&OutgoingMail>) -> Vec<String> {
    let mut lines = vec![format!("{} {}", reply.status, reply.body.message)];
    if let Some(ref error) = reply.body.error {
        lines.push(format!("{}Error: {}", indent(1), error));
    }

    if let Some(mail) = mail {
        lines.push("Mail".to_string());
        lines.push(format!("{}From: {}", indent(1), mail.from));
        lines.push(format!("{}To: {}", indent(1), mail.to));
        lines.push(format!("{}Reply-To: {}", indent(1), mail.reply_to));
        lines.push(format!("{}Subject: {}", indent(1), mail.subject));
        lines.push(String::new());
        for body_line in mail.text.lines() {
            lines.push(format!("{}{}", indent(1), body_line));
        }
    }

    lines
}

/// Print contact output to stdout.
pub fn print_contact_output(reply: &ContactReply, mail: Option<&OutgoingMail>) {
    for line in format_contact_output(reply, mail) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{FilterReport, ImageReport};
    use crate::contact::ContactResponse;
    use crate::filter::FilterOption;
    use crate::gallery::{GalleryState, ProbeRequest};
    use crate::page::PageSnapshot;
    use crate::probe::ProbeError;
    use crate::replay::Action;
    use crate::section::ScrollCommand;
    use crate::sizing::DialogBox;
    use crate::types::{Dimensions, SectionId};

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn truncate_desc_short_and_long() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
        let text = "a".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "a".repeat(40)));
    }

    #[test]
    fn truncate_desc_counts_chars_not_bytes() {
        assert_eq!(truncate_desc("ééééé", 3), "ééé...");
    }

    #[test]
    fn gallery_header_singular_and_plural() {
        assert_eq!(gallery_header(GalleryKind::Achievements, 1), "Achievements (1 item)");
        assert_eq!(gallery_header(GalleryKind::Projects, 3), "Projects (3 items)");
    }

    // =========================================================================
    // check
    // =========================================================================

    fn image(gallery: GalleryKind, index: usize, title: &str, result: Result<Dimensions, ProbeError>) -> ImageReport {
        ImageReport {
            gallery,
            index,
            title: title.to_string(),
            uri: format!("/images/{}.png", title.to_lowercase()),
            result,
        }
    }

    #[test]
    fn check_output_lists_galleries_filters_and_summary() {
        let report = CheckReport {
            images: vec![
                image(GalleryKind::Certifications, 0, "AWS", Ok(Dimensions::new(1200, 900))),
                image(
                    GalleryKind::Certifications,
                    1,
                    "GCP",
                    Err(ProbeError::NotFound("/images/gcp.png".into())),
                ),
                image(GalleryKind::Projects, 0, "Shop", Ok(Dimensions::new(640, 480))),
            ],
            filters: vec![
                FilterReport {
                    option: FilterOption { label: "All".into(), value: "all".into() },
                    matches: 1,
                },
                FilterReport {
                    option: FilterOption { label: "Web".into(), value: "web".into() },
                    matches: 0,
                },
            ],
            unreferenced: vec!["images/old.png".into()],
            warnings: vec![],
        };
        let lines = format_check_output(&report);
        assert_eq!(
            lines,
            vec![
                "Certifications (2 items)",
                "    001 AWS",
                "        Image: /images/aws.png (1200x900)",
                "    002 GCP",
                "        Image: /images/gcp.png (missing)",
                "",
                "Projects (1 item)",
                "    001 Shop",
                "        Image: /images/shop.png (640x480)",
                "",
                "Filters",
                "    All (all): 1 project",
                "    Web (web): 0 projects",
                "",
                "Unreferenced images",
                "    images/old.png",
                "",
                "Checked 3 images, 1 failed",
            ]
        );
    }

    #[test]
    fn check_output_shows_unreadable_reason_and_warnings() {
        let report = CheckReport {
            images: vec![image(
                GalleryKind::Achievements,
                0,
                "Prize",
                Err(ProbeError::Unreadable { uri: "/images/prize.png".into(), reason: "bad header".into() }),
            )],
            warnings: vec!["filter 'API' (api) matches no project".into()],
            ..CheckReport::default()
        };
        let lines = format_check_output(&report);
        assert!(lines[2].ends_with("(failed to read dimensions of /images/prize.png: bad header)"));
        assert!(lines.contains(&"Warnings".to_string()));
        assert_eq!(lines.last().unwrap(), "Checked 1 image, 1 failed");
    }

    // =========================================================================
    // replay
    // =========================================================================

    fn snapshot() -> PageSnapshot {
        PageSnapshot {
            active_section: SectionId::Certifications,
            header_elevated: true,
            menu_open: false,
            tracking_suspended: true,
            filter: "all".into(),
            visible_projects: vec![],
            galleries: vec![GallerySnapshot {
                kind: GalleryKind::Certifications,
                state: GalleryState {
                    open_index: Some(0),
                    visible: true,
                    loading: true,
                    dimensions: Dimensions::new(800, 600),
                },
                title: Some("AWS".into()),
                dialog: Some(DialogBox { width: 848.0, height: 760.0 }),
            }],
        }
    }

    #[test]
    fn replay_step_format() {
        let step = ReplayStep {
            at: 100,
            action: Action::Nav { section: SectionId::Certifications },
            effects: vec![Effect::ScrollTo(ScrollCommand { top: 1520.0, smooth: true })],
            snapshot: snapshot(),
        };
        assert_eq!(
            format_replay_step(&step),
            vec![
                "[   100ms] nav certifications",
                "    \u{2192} scroll to 1520 (smooth)",
                "    Section: certifications (tracking paused, header elevated)",
                "    certifications: 001 AWS (loading)",
                "        Dialog: 848x760 for 800x600",
            ]
        );
    }

    #[test]
    fn replay_step_shows_probe_filter_and_closing() {
        let mut snap = snapshot();
        snap.tracking_suspended = false;
        snap.header_elevated = false;
        snap.filter = "web".into();
        snap.visible_projects = vec!["Shop".into()];
        snap.galleries[0].state.visible = false;
        snap.galleries[0].state.loading = false;
        snap.galleries[0].dialog = None;

        let step = ReplayStep {
            at: 5,
            action: Action::Filter { tag: "web".into() },
            effects: vec![Effect::Probe {
                gallery: GalleryKind::Projects,
                request: ProbeRequest { ticket: crate::gallery::Ticket::default(), uri: "/a.png".into() },
            }],
            snapshot: snap,
        };
        let lines = format_replay_step(&step);
        assert_eq!(lines[1], "    \u{2192} probe /a.png for projects");
        assert_eq!(lines[2], "    Section: certifications");
        assert_eq!(lines[3], "    Filter: web (1 project)");
        assert_eq!(lines[4], "    certifications: 001 AWS (closing)");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn replay_step_shows_open_menu() {
        let mut snap = snapshot();
        snap.tracking_suspended = false;
        snap.menu_open = true;
        snap.galleries.clear();
        let step = ReplayStep {
            at: 0,
            action: Action::Menu,
            effects: vec![],
            snapshot: snap,
        };
        assert_eq!(
            format_replay_step(&step),
            vec![
                "[     0ms] menu",
                "    Section: certifications (header elevated, menu open)",
            ]
        );
    }

    // =========================================================================
    // contact
    // =========================================================================

    #[test]
    fn contact_output_without_mail() {
        let reply = ContactReply {
            status: 405,
            body: ContactResponse { message: "Method not allowed".into(), error: None },
        };
        assert_eq!(format_contact_output(&reply, None), vec!["405 Method not allowed"]);
    }

    #[test]
    fn contact_output_with_error_and_mail() {
        let reply = ContactReply {
            status: 500,
            body: ContactResponse {
                message: "Failed to send message".into(),
                error: Some("connection refused".into()),
            },
        };
        let mail = OutgoingMail {
            from: "a@x".into(),
            to: "b@x".into(),
            reply_to: "c@x".into(),
            subject: "S".into(),
            text: "Name: A\nMessage: hi\n".into(),
            html: String::new(),
        };
        let lines = format_contact_output(&reply, Some(&mail));
        assert_eq!(lines[0], "500 Failed to send message");
        assert_eq!(lines[1], "    Error: connection refused");
        assert_eq!(lines[2], "Mail");
        assert_eq!(lines[5], "    Reply-To: c@x");
        assert_eq!(lines[8..].to_vec(), vec!["    Name: A", "    Message: hi"]);
    }
}
