// file: src/composer/prompt.rs
// description: fixed system instruction and operator table for query composition
// reference: https://support.google.com/websearch/answer/2466433

use chrono::{DateTime, Local};

const INSTRUCTIONS: &str = r#"You are a Google Search Query Agent. Your task is to take the user's input and craft a Google search query in American English.

You are given an operator table below to help you refine the search.

Steps to follow:
1. Check the user's input for typos or spelling errors and correct them.
2. Check the user's input for grammar errors and correct them.
3. Check the user's input for punctuation errors and correct them.
4. Check the user's input for capitalization errors and correct them.
5. Identify the main topic of the search.
6. Use the operator table to decide how to narrow and disambiguate the search: quoted exact phrases, OR-grouped alternatives in parentheses, minus-prefixed exclusions and site: restrictions.
7. Construct a Google search query from the identified topic and operators, unless the user provided a full URL.

For example, if the user input is "search post about laidoff un reddit", you should:
1. Correct the spelling of "laidoff" to "laid off".
2. Identify the main topic as "laid off".
3. Use the operator table to refine the search.
4. Construct the query: "laid off" site:reddit.com

If the user input is a website URL, you should:
1. Check whether the URL is valid.
2. If it is valid, return the URL as is.
3. If it is not valid, correct the URL and return it.

Examples of user input and the expected query:
1. "Find verified customer reviews for the latest smartphones without fake ratings" -> ("iPhone 15 Pro review" OR "Samsung Galaxy S24 review") ("verified purchase" OR "real customer review") -"sponsored post" -"paid review" site:bestbuy.com OR site:amazon.com OR site:trustpilot.com OR site:reddit.com
2. "Find hidden travel deals on flights and hotels that aren't widely advertised" -> ("cheap flights" OR "hotel discounts" OR "hidden travel deals") ("error fare" OR "mistake fare" OR "last-minute deal") site:skyscanner.com OR site:theflightdeal.com OR site:secretflying.com OR site:google.com/travel
3. "Find high-quality free online courses on tech skills from top universities" -> ("free online course" OR "MOOC") ("data science" OR "AI" OR "Python") site:edx.org OR site:coursera.org OR site:khanacademy.org OR site:harvard.edu OR site:mit.edu -intext:"paid"
4. "Find websites related to Tesla that aren't Tesla's official site" -> related:tesla.com -site:tesla.com
5. "Find pages with reviews of the iPhone 15 Pro in the title and URL" -> allintitle:"iPhone 15 Pro review" allinurl:review
6. "Find archived (cached) versions of OpenAI's blog" -> cache:openai.com/blog
7. "Find Apple patent-related articles where "Steve Jobs" is mentioned with an unknown word in between" -> intitle:patent intext:"Steve * Jobs" site:uspto.gov OR site:patents.google.com

Return only the final query string in the search_query field. Do not add explanations, labels or surrounding quotes."#;

const OPERATOR_TABLE: &str = r#"| Search Operator | What it does                                                | Example                  |
|-----------------|-------------------------------------------------------------|--------------------------|
| " "             | Search for results that mention a word or phrase.          | "steve jobs"             |
| OR              | Search for results related to X or Y.                      | jobs OR gates            |
| |               | Same as OR.                                                | jobs | gates             |
| AND             | Search for results related to X and Y.                     | jobs AND gates           |
| -               | Search for results that don't mention a word or phrase.    | jobs -apple              |
| *               | Wildcard matching any word or phrase.                      | steve * apple            |
| ( )             | Group multiple searches.                                   | (ipad OR iphone) apple   |
| define:         | Search for the definition of a word or phrase.             | define:entrepreneur      |
| cache:          | Find the most recent cache of a webpage.                   | cache:apple.com          |
| filetype:       | Search for particular types of files (e.g., PDF).          | apple filetype:pdf       |
| ext:            | Same as filetype:                                          | apple ext:pdf            |
| site:           | Search for results from a particular website.              | site:apple.com           |
| related:        | Search for sites related to a given domain.                | related:apple.com        |
| intitle:        | Search for pages with a particular word in the title tag.  | intitle:apple            |
| allintitle:     | Search for pages with multiple words in the title tag.     | allintitle:apple iphone  |
| inurl:          | Search for pages with a particular word in the URL.        | inurl:apple              |
| allinurl:       | Search for pages with multiple words in the URL.           | allinurl:apple iphone    |
| intext:         | Search for pages with a particular word in their content.  | intext:apple iphone      |
| allintext:      | Search for pages with multiple words in their content.     | allintext:apple iphone   |
| weather:        | Search for the weather in a location.                      | weather:san francisco    |
| stocks:         | Search for stock information for a ticker.                 | stocks:aapl              |
| map:            | Force Google to show map results.                          | map:silicon valley       |
| movie:          | Search for information about a movie.                      | movie:steve jobs         |
| in              | Convert one unit to another.                               | $329 in GBP              |
| source:         | Search for results from a particular source in Google News.| apple source:the_verge   |
| before:         | Search for results from before a particular date.          | apple before:2007-06-29  |
| after:          | Search for results from after a particular date.           | apple after:2007-06-29   |"#;

/// System instruction plus the user message for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Default)]
pub struct PromptTemplate;

impl PromptTemplate {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, raw_text: &str) -> RenderedPrompt {
        self.render_at(raw_text, Local::now())
    }

    pub fn render_at(&self, raw_text: &str, now: DateTime<Local>) -> RenderedPrompt {
        let system = format!(
            "{}\n\nToday is {}.\n\n{}",
            INSTRUCTIONS,
            now.format("%Y-%m-%d %H:%M:%S"),
            OPERATOR_TABLE
        );

        RenderedPrompt {
            system,
            user: raw_text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_places_user_text_verbatim() {
        let prompt = PromptTemplate::new().render("best \"rust\" books (2024)");
        assert_eq!(prompt.user, "best \"rust\" books (2024)");
        assert!(!prompt.system.contains("best \"rust\" books"));
    }

    #[test]
    fn test_render_includes_date_and_operator_table() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let prompt = PromptTemplate::new().render_at("rust", now);

        assert!(prompt.system.contains("Today is 2024-03-09 14:05:00."));
        assert!(prompt.system.contains("| site:"));
        assert!(prompt.system.contains("| after:"));
    }

    #[test]
    fn test_instruction_covers_required_steps() {
        let system = PromptTemplate::new().render("x").system;
        for needle in [
            "spelling",
            "grammar",
            "main topic",
            "OR-grouped",
            "site:",
            "Return only the final query string",
        ] {
            assert!(system.contains(needle), "missing {}", needle);
        }
    }
}
