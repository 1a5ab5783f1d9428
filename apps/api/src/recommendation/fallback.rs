//! The static paragraph served when remote generation is unavailable.
//!
//! Deliberately input-independent: callers get the same bytes on every call,
//! which keeps offline behavior predictable and trivially cacheable by the
//! front-end. Sentences are joined with single spaces, never newlines, so the
//! single-paragraph output guarantee holds without post-processing.

/// Fixed career-recommendation paragraph for the sample chart and profile.
pub const FALLBACK_PARAGRAPH: &str = "With Sun in Libra, you naturally value fairness, relationships, and balance, and with an Ascendant in Capricorn, you bring a steady, disciplined approach to how you present yourself at work. \
Your DISC profile — high Conscientiousness and low Influence — suggests you thrive in roles that reward precision, structure, and deep thinking rather than constant social selling or networking. \
A fulfilling career path for you could be in areas like project coordination, compliance, technical writing, data analysis, or quality assurance — roles where a methodological mindset and an eye for detail are prized. \
To maximize satisfaction, look for positions that allow collaborative harmony (so your Libra strengths are honored) but offer clear frameworks, measurable goals, and opportunities to work independently on structured tasks that showcase your reliability.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_paragraph_has_no_newlines() {
        assert!(!FALLBACK_PARAGRAPH.contains('\n'));
    }
}
