//! Summary message rendering.

use crate::judges::types::DeltaEntry;

/// Above this many new problems a user's block is left blank. Bulk imports
/// and first runs would otherwise dump a whole solve history into the chat.
pub const MAX_LISTED_PROBLEMS: usize = 30;

#[derive(Debug, Clone)]
pub struct UserReport {
    pub user_name: String,
    pub problems: Vec<DeltaEntry>,
    pub text: String,
}

impl UserReport {
    /// `None` when the user solved nothing new.
    pub fn build(user_name: &str, problems: Vec<DeltaEntry>) -> Option<Self> {
        if problems.is_empty() {
            return None;
        }

        let text = if problems.len() > MAX_LISTED_PROBLEMS {
            String::new()
        } else {
            render_user_text(user_name, &problems)
        };

        Some(Self {
            user_name: user_name.to_string(),
            problems,
            text,
        })
    }

    pub fn solved_count(&self) -> usize {
        self.problems.len()
    }
}

pub fn render_line(entry: &DeltaEntry) -> String {
    match entry.score {
        Some(score) => format!("{} ({} pts) {}", entry.title, score, entry.url),
        None => format!("{} {}", entry.title, entry.url),
    }
}

pub fn render_user_text(user_name: &str, problems: &[DeltaEntry]) -> String {
    let mut lines = Vec::with_capacity(problems.len() + 1);
    lines.push(format!("_{}_ solved *{}* problems!", user_name, problems.len()));
    lines.extend(problems.iter().map(render_line));
    lines.join("\n")
}

/// Most productive users first; blank blocks are dropped. An empty result
/// means there is nothing to post.
pub fn aggregate(mut reports: Vec<UserReport>) -> String {
    // sort_by is stable, so equal counts keep their processing order.
    reports.sort_by(|a, b| b.solved_count().cmp(&a.solved_count()));

    reports
        .iter()
        .map(|report| report.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
