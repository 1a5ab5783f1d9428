// Prompt construction for the career-recommendation generation call.
// The probe prompt lives next to the probing logic in provider.rs.

/// Sample birth chart used when a request omits the field, and by the CLI.
pub const DEFAULT_BIRTH_CHART: &str = "Sun in Libra, Ascendant in Capricorn";

/// Sample DISC profile used when a request omits the field, and by the CLI.
pub const DEFAULT_DISC_PROFILE: &str = "High C, low I";

/// Builds the generation instruction, embedding both inputs verbatim along
/// with the three fixed thematic bullet points.
pub fn build_prompt(birth_chart: &str, disc_profile: &str) -> String {
    format!(
        "Synthesize a career recommendation based on a person with a birth chart indicating \
'{birth_chart}' and a DISC profile of '{disc_profile}'. \n\n\
The final output should be a single paragraph written in a friendly, conversational tone, \
suitable for a personalized report. \n\n\
Key themes to explore:\n\
- Balancing an innate desire for harmony with a disciplined work ethic\n\
- Leveraging a detail-oriented nature in a role that values structure\n\
- Finding career paths that align with both astrological and personality traits\n\n\
Please provide exactly one well-structured paragraph that synthesizes these insights into \
actionable career advice."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_both_inputs_verbatim() {
        let prompt = build_prompt("Moon in Aries", "High D, high I");
        assert!(prompt.contains("'Moon in Aries'"));
        assert!(prompt.contains("'High D, high I'"));
    }

    #[test]
    fn prompt_carries_the_three_fixed_themes() {
        let prompt = build_prompt(DEFAULT_BIRTH_CHART, DEFAULT_DISC_PROFILE);
        assert!(prompt.contains("desire for harmony"));
        assert!(prompt.contains("detail-oriented nature"));
        assert!(prompt.contains("astrological and personality traits"));
    }
}
