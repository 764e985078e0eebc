use std::str::FromStr;

use scanrelay_types::api::VerifyStatus;
use scanrelay_types::event::{Actor, ReactionEntry, Update};
use thiserror::Error;

const APPROVE_GLYPH: char = '👍';
const REJECT_GLYPH: char = '👎';

const FALLBACK_NAME: &str = "Unknown";

/// How a rejection is recognized in the emoji field. Earlier platform-bot
/// revisions also accepted a literal "dislike" token; later ones only the
/// glyph. Both behaviors stay selectable rather than guessing which is right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectRule {
    #[default]
    GlyphOnly,
    GlyphOrDislikeToken,
}

#[derive(Debug, Error)]
#[error("unknown reject rule '{0}', expected 'glyph' or 'glyph-or-token'")]
pub struct ParseRejectRuleError(String);

impl FromStr for RejectRule {
    type Err = ParseRejectRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glyph" => Ok(RejectRule::GlyphOnly),
            "glyph-or-token" => Ok(RejectRule::GlyphOrDislikeToken),
            other => Err(ParseRejectRuleError(other.to_string())),
        }
    }
}

impl RejectRule {
    fn matches(self, emoji: &str) -> bool {
        if emoji.contains(REJECT_GLYPH) {
            return true;
        }
        match self {
            RejectRule::GlyphOnly => false,
            RejectRule::GlyphOrDislikeToken => emoji.to_lowercase().contains("dislike"),
        }
    }
}

/// One reaction, normalized from whichever shape the platform delivered.
/// Built fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionCandidate {
    pub emoji: String,
    pub name: String,
    pub timestamp: Option<i64>,
}

/// What the reactions on an update amount to: a verification status plus the
/// user credited with the most recent reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionSignal {
    pub status: VerifyStatus,
    pub last_reactor: String,
}

/// Name resolution order: last name, username, first name, fallback literal.
pub fn display_name(actor: Option<&Actor>) -> String {
    actor
        .and_then(|a| {
            a.last_name
                .as_deref()
                .or(a.username.as_deref())
                .or(a.first_name.as_deref())
        })
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

fn candidate_from_entry(entry: &ReactionEntry) -> ReactionCandidate {
    ReactionCandidate {
        emoji: entry.emoji.clone().unwrap_or_default(),
        name: display_name(entry.user.as_ref()),
        timestamp: entry.date,
    }
}

// One extractor per reaction shape the platform has shipped, tried in order;
// first non-empty result wins.
type Extractor = fn(&Update) -> Option<Vec<ReactionCandidate>>;

const EXTRACTORS: [Extractor; 4] = [
    message_reactions,
    edited_message_reactions,
    reaction_event,
    singular_reaction,
];

fn message_reactions(update: &Update) -> Option<Vec<ReactionCandidate>> {
    let entries = update.message.as_ref()?.reactions.as_ref()?;
    non_empty(entries.iter().map(candidate_from_entry).collect())
}

fn edited_message_reactions(update: &Update) -> Option<Vec<ReactionCandidate>> {
    let entries = update.edited_message.as_ref()?.reactions.as_ref()?;
    non_empty(entries.iter().map(candidate_from_entry).collect())
}

fn reaction_event(update: &Update) -> Option<Vec<ReactionCandidate>> {
    let event = update.message_reaction.as_ref()?;
    let entries = event.new_reaction.as_ref()?;
    // Actor and timestamp live at the event level in this shape; entries carry
    // only the emoji unless a revision inlined them.
    let candidates = entries
        .iter()
        .map(|entry| ReactionCandidate {
            emoji: entry.emoji.clone().unwrap_or_default(),
            name: display_name(entry.user.as_ref().or(event.user.as_ref())),
            timestamp: entry.date.or(event.date),
        })
        .collect();
    non_empty(candidates)
}

fn singular_reaction(update: &Update) -> Option<Vec<ReactionCandidate>> {
    let entry = update.reaction.as_ref()?;
    Some(vec![ReactionCandidate {
        emoji: entry.emoji.clone().unwrap_or_default(),
        name: display_name(entry.user.as_ref().or(update.actor.as_ref())),
        timestamp: entry.date,
    }])
}

fn non_empty(candidates: Vec<ReactionCandidate>) -> Option<Vec<ReactionCandidate>> {
    if candidates.is_empty() { None } else { Some(candidates) }
}

/// Collect reaction candidates from the first populated location on the update.
pub fn collect_candidates(update: &Update) -> Option<Vec<ReactionCandidate>> {
    EXTRACTORS.iter().find_map(|extract| extract(update))
}

/// The candidate with the greatest timestamp, input position breaking ties.
/// `None < Some(_)`, so untimestamped candidates never beat timestamped ones;
/// with no timestamps at all the last entry in input order wins.
fn last_reactor(candidates: &[ReactionCandidate]) -> Option<&ReactionCandidate> {
    candidates
        .iter()
        .enumerate()
        .max_by_key(|(i, c)| (c.timestamp, *i))
        .map(|(_, c)| c)
}

/// Interpret the reactions on an update; None means no relevant signal.
/// Approve beats reject by business rule: one positive reaction marks the
/// record found no matter how many negatives surround it.
pub fn analyze_reactions(update: &Update, rule: RejectRule) -> Option<ReactionSignal> {
    let candidates = collect_candidates(update)?;

    let has_approve = candidates.iter().any(|c| c.emoji.contains(APPROVE_GLYPH));
    let has_reject = candidates.iter().any(|c| rule.matches(&c.emoji));

    let status = if has_approve {
        VerifyStatus::Found
    } else if has_reject {
        VerifyStatus::NotFound
    } else {
        return None;
    };

    Some(ReactionSignal {
        status,
        last_reactor: last_reactor(&candidates)?.name.clone(),
    })
}
