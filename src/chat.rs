//! Scripted FAQ responder. No model, no memory: input is lowercased and
//! tested against an ordered rule table; the first rule with a keyword
//! substring match renders its template from the static site content.

use crate::content::SiteContent;

struct ChatRule {
    keywords: &'static [&'static str],
    render: fn(&SiteContent) -> String,
}

impl ChatRule {
    fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|keyword| query.contains(keyword))
    }
}

// Evaluated top to bottom, first match wins. Keep the more specific rules
// (book, ventures) above the generic ones (greeting, AI).
const RULES: &[ChatRule] = &[
    ChatRule {
        keywords: &["book", "read", "author", "playbook"],
        render: book_reply,
    },
    ChatRule {
        keywords: &[
            "draftwise",
            "relayform",
            "parsewell",
            "venture",
            "project",
            "startup",
            "company",
        ],
        render: ventures_reply,
    },
    ChatRule {
        keywords: &["service", "consult", "hire", "work with", "help my business"],
        render: services_reply,
    },
    ChatRule {
        keywords: &["about", "who is", "who are", "background", "experience"],
        render: about_reply,
    },
    ChatRule {
        keywords: &["contact", "email", "reach", "get in touch"],
        render: contact_reply,
    },
    ChatRule {
        keywords: &["location", "where", "based"],
        render: location_reply,
    },
    ChatRule {
        keywords: &["artificial intelligence", "machine learning", "ai"],
        render: ai_reply,
    },
    ChatRule {
        keywords: &["hello", "hi", "hey", "howdy"],
        render: greeting_reply,
    },
    ChatRule {
        keywords: &["thanks", "thank you", "appreciate"],
        render: thanks_reply,
    },
];

/// Returns the canned response for `input`. Deterministic: the same input
/// and content always produce the same reply.
pub fn respond(input: &str, content: &SiteContent) -> String {
    let query = input.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(&query))
        .map(|rule| (rule.render)(content))
        .unwrap_or_else(|| fallback_reply(content))
}

fn book_reply(content: &SiteContent) -> String {
    format!(
        "{owner} wrote \"{title}\" — {pages} pages on {topics}. \
         It's linked in the books section of the site if you'd like a copy!",
        owner = content.owner,
        title = content.book_title,
        pages = content.book_pages,
        topics = content.book_topics,
    )
}

fn ventures_reply(content: &SiteContent) -> String {
    format!(
        "{owner} is currently working on: {ventures}. \
         You can find more detail in the projects section.",
        owner = content.owner,
        ventures = content.ventures.join("; "),
    )
}

fn services_reply(content: &SiteContent) -> String {
    format!(
        "{owner} offers {services}. Drop a line at {email} to talk details.",
        owner = content.owner,
        services = content.services.join(", "),
        email = content.contact_email,
    )
}

fn about_reply(content: &SiteContent) -> String {
    format!(
        "{owner} — {tagline} Based in {location}, building products and writing \
         about practical uses of AI.",
        owner = content.owner,
        tagline = content.tagline,
        location = content.location,
    )
}

fn contact_reply(content: &SiteContent) -> String {
    format!(
        "The best way to reach {owner} is {email}. Every message gets read.",
        owner = content.owner,
        email = content.contact_email,
    )
}

fn location_reply(content: &SiteContent) -> String {
    format!(
        "{owner} is based in {location}, and works with clients remotely.",
        owner = content.owner,
        location = content.location,
    )
}

fn ai_reply(content: &SiteContent) -> String {
    format!(
        "AI is {owner}'s main focus — both in \"{title}\" and in the products \
         listed on this site. Ask about the book or the ventures for specifics!",
        owner = content.owner,
        title = content.book_title,
    )
}

fn greeting_reply(content: &SiteContent) -> String {
    format!(
        "Hey there! I'm {assistant}, {owner}'s site assistant. I can tell you \
         about the book, the projects, or how to get in touch. What would you \
         like to know?",
        assistant = content.assistant_name,
        owner = content.owner,
    )
}

fn thanks_reply(content: &SiteContent) -> String {
    format!(
        "You're welcome! If anything else comes up, {owner} is at {email}.",
        owner = content.owner,
        email = content.contact_email,
    )
}

fn fallback_reply(content: &SiteContent) -> String {
    format!(
        "I'm not sure about that one — I only know about {owner}'s work. \
         Try asking about the book, the projects, or services, or reach out \
         directly at {email}.",
        owner = content.owner,
        email = content.contact_email,
    )
}
