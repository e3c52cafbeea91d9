//! Prompt for recovering ad records from one chunk of scraped text

/// Builds prompts for the LLM to extract ads
pub struct PromptBuilder<'a> {
    chunk: &'a str,
    query: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(chunk: &'a str, query: &'a str) -> Self {
        Self { chunk, query }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(
            EXTRACTION_INSTRUCTIONS.len() + RECORD_SCHEMA.len() + self.chunk.len() + 256,
        );

        // 1. Instruction and schema
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nSchema:\n");
        prompt.push_str(RECORD_SCHEMA);
        prompt.push_str("\n\n");

        // 2. The chunk to analyze
        prompt.push_str(&format!("Extract ads relevant to \"{}\" from:\n", self.query));
        prompt.push_str("---\n");
        prompt.push_str(self.chunk);
        prompt.push_str("\n---\n\n");

        // 3. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a Facebook Ad Library extractor. The text below was scraped from the Ad Library and may contain several ads, navigation noise and partial ads at the edges.

Rules:
- One object per ad; an ad starts at its "Library ID:" line
- Copy values exactly as they appear; never invent a value
- Use null for anything the text does not show
- content_preview is the first 200 characters of the ad copy
- contact is a phone number, WhatsApp number or other handle found in the ad
- delivery_cost_inside / delivery_cost_outside are the delivery charges inside and outside the city, if stated
- Skip ads that are cut off before their Library ID"#;

const RECORD_SCHEMA: &str = r#"{
  "ads": [
    {
      "advertiser": "",
      "advertiser_facebook_link": "",
      "advertiser_website_link": "",
      "library_id": "",
      "start_date": "",
      "active_time": "",
      "content_preview": "",
      "contact": "",
      "delivery_cost_inside": "",
      "delivery_cost_outside": ""
    }
  ]
}"#;

const OUTPUT_FORMAT_REMINDER: &str =
    r#"Return ONLY one JSON object of the form {"ads": [...]}, no explanations. Use {"ads": []} if the text contains no ads."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_query_and_chunk() {
        let prompt = PromptBuilder::new("Library ID: 123 Foo", "minifan").build();
        assert!(prompt.contains("relevant to \"minifan\""));
        assert!(prompt.contains("---\nLibrary ID: 123 Foo\n---"));
    }

    #[test]
    fn test_prompt_includes_schema() {
        let prompt = PromptBuilder::new("text", "q").build();
        for field in [
            "advertiser_facebook_link",
            "advertiser_website_link",
            "library_id",
            "delivery_cost_outside",
        ] {
            assert!(prompt.contains(field), "missing {}", field);
        }
        assert!(prompt.ends_with(OUTPUT_FORMAT_REMINDER));
    }
}
