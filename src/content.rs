/// Static site content shared by the chat responder and the welcome email.
/// Edit this to rebrand the site; none of the request handling depends on
/// the specific values.
#[derive(Debug, Clone)]
pub struct SiteContent {
    pub owner: &'static str,
    pub tagline: &'static str,
    pub location: &'static str,
    pub site_url_label: &'static str,
    pub book_title: &'static str,
    pub book_pages: u32,
    pub book_topics: &'static str,
    pub ventures: &'static [&'static str],
    pub services: &'static [&'static str],
    pub contact_email: &'static str,
    pub assistant_name: &'static str,
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            owner: "Jordan Avery",
            tagline: "Developer. Author. AI consultant.",
            location: "Portland, Oregon",
            site_url_label: "jordanavery.dev",
            book_title: "The Leverage Playbook: Building Products in the Age of AI",
            book_pages: 384,
            book_topics: "AI product strategy, automation, and independent software businesses",
            ventures: &[
                "Draftwise — AI contract review for freelancers (founder)",
                "Relayform — form backend for static sites (founder)",
                "Parsewell — document data extraction API (co-founder)",
            ],
            services: &[
                "AI strategy consulting",
                "Web application development",
                "Technical architecture reviews",
                "Workshops and talks",
            ],
            contact_email: "hello@jordanavery.dev",
            assistant_name: "Ari",
        }
    }
}
