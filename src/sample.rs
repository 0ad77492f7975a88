/*!
 * Built-in sample document: a Wikinews article on the 2015 Catalan
 * regional elections, three paragraphs separated by single line breaks.
 */

use crate::document::Document;

pub const SAMPLE_ID: &str = "2465939";

pub const SAMPLE_TITLE: &str = "Independence debate as Catalonia holds regional elections";

pub const SAMPLE_URI: &str =
    "https://en.wikinews.org/wiki/Independence_debate_as_Catalonia_holds_regional_elections?dpl_id=2465939";

pub const SAMPLE_TEXT: &str = concat!(
    "Regional elections are taking place today in Catalonia, Spain, in which ",
    "the biggest talking point is whether the autonomous region should",
    " become an independent country. The polls are being held early as the ",
    "national government has not allowed an official referendum on ",
    "independence. Opinion polls, according to Reuters, suggest the ",
    "secessionists will win more than half of the 135 regional Parliament",
    " seats but less than half of the popular vote.",
    "\n",
    "The pro-independence parties include the Junts pel Sí (Together for ",
    "Yes) coalition and the left-wing Popular Unity Candidacy (CUP). If ",
    "they win a clear majority, the Junts pel Sí hopes to hold further ",
    "elections in eighteen months after developing future state institutions",
    " such as a separate tax office. However, they might have to find a ",
    "compromise candidate for regional president because CUP does not support",
    " the incumbent, Artur Mas. The CUP is also campaigning for Catalonia ",
    "to leave the European Union.",
    "\n",
    "In contrast, the People's Party, led by Spanish Prime Minister Mariano ",
    "Rajoy, has called for Catalonia to remain within Spain. Rajoy took part ",
    "in a campaign video on Friday in which he says \"united we will win\".",
);

/// The sample article in the given language, with its metadata set
pub fn sample_document(language: &str) -> Document {
    Document::new(SAMPLE_TEXT, language)
        .with_id(SAMPLE_ID)
        .with_title(SAMPLE_TITLE)
        .with_uri(SAMPLE_URI)
}
