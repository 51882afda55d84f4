use super::tokenize::Token;

/// How many tokens to the left of a match the negation scan may cover.
pub const NEGATION_WINDOW: usize = 6;

const NEG_TRIGGERS: &[&str] = &[
    "no", "not", "without", "deny", "denies", "denied", "never", "none",
];

/// Tokens that stop negation from propagating across a clause break.
const NEG_BOUNDARIES: &[&str] = &[",", ";", "but", "however", "though", "yet"];

/// Left-only negation: walk leftward from the match start for up to `window`
/// tokens, stopping early at a boundary token. Never looks right of the match.
pub fn negated_to_left(tokens: &[Token], match_start: usize, window: usize) -> bool {
    let floor = match_start.saturating_sub(window);
    for i in (floor..match_start).rev() {
        let tok = tokens[i].lower.as_str();
        if NEG_BOUNDARIES.contains(&tok) {
            break;
        }
        if NEG_TRIGGERS.contains(&tok) {
            return true;
        }
    }
    false
}
