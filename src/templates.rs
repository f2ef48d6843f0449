//! HTML bodies for every email the service sends.
//!
//! Rendering is pure: the functions only format the data they are given.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::SiteSettings;
use crate::domain::poem_announcement::Poem;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

pub const WELCOME_SUBJECT: &str = "Welcome to the Poetry Community!";
pub const EXCERPT_MAX_LENGTH: usize = 300;

pub fn announcement_subject(poem: &Poem) -> String {
    format!("New Poem Published: \"{}\"", poem.title)
}

/// First `EXCERPT_MAX_LENGTH` characters of the poem, with "..." when cut.
pub fn poem_excerpt(content: &str) -> String {
    let mut graphemes = content.graphemes(true);
    let excerpt: String = graphemes.by_ref().take(EXCERPT_MAX_LENGTH).collect();

    if graphemes.next().is_some() {
        format!("{}...", excerpt)
    } else {
        excerpt
    }
}

pub fn unsubscribe_link(site: &SiteSettings, recipient: &SubscriberEmail) -> String {
    format!(
        "{}/unsubscribe?email={}",
        site.base_url,
        urlencoding::encode(recipient.as_ref())
    )
}

pub fn welcome_email(site: &SiteSettings, name: Option<&SubscriberName>) -> String {
    let greeting = match name {
        Some(name) => format!("Welcome to Poetry Community, {}!", name.to_html()),
        None => String::from("Welcome to Poetry Community!"),
    };

    format!(
        r##"
  <div style="font-family:'Segoe UI',Arial,sans-serif;max-width:600px;margin:0 auto;background:#fff;border-radius:12px;box-shadow:0 2px 12px #ccb7f4;padding:32px 24px 20px 24px;">
    <header style="text-align:center;margin-bottom:28px;">
      <h1 style="color:#7c3aed;font-size:2em;margin:0;font-weight:bold;letter-spacing:-1px;">{greeting}</h1>
      <p style="color:#6d28d9;font-size:1.08em;margin-top:10px;font-weight:500;">Your journey into a world of inspiration begins here.</p>
    </header>
    <section style="margin-bottom:28px;">
      <p style="font-size:1.15em;color:#3b3054;">We're delighted to have you join our growing family of poetry lovers and creators.</p>
      <p style="font-size:1.08em;color:#5a189a;">
        At <b>Poetry Community</b>, you can discover and share poems, connect with fellow enthusiasts, and explore a world of creativity and inspiration.
      </p>
      <div style="background:#f3e8ff;border-radius:8px;padding:20px 20px 15px 24px;margin:22px 0 18px 0;">
        <span style="font-weight:700;font-size:1.08em;color:#7c3aed;display:block;margin-bottom:11px;">Next Steps:</span>
        <ul style="padding-left:20px;margin:0 0 0 5px;color:#44337a;font-size:1em;">
          <li style="margin-bottom:7px;"><a href="{site_url}/poem" style="color:#7c3aed;text-decoration:underline;">Explore featured poems</a></li>
          <li style="margin-bottom:7px;">Share your own poetic creations</li>
          <li>Connect with a supportive and vibrant community</li>
        </ul>
      </div>
      <p style="font-size:1em;color:#4b2774;">
        If you have any questions or suggestions, feel free to reply to this email or reach out to our support team at
        <a href="mailto:{support_email}" style="color:#7c3aed;text-decoration:underline;">{support_email}</a>.
      </p>
    </section>
    <footer style="text-align:center;color:#6c4a84;font-size:0.97em;">
      <p style="margin-top:18px;font-size:1.09em;">
        Welcome aboard, and happy reading and writing!<br/>
        <span style="color:#b197d9;">Team Poemsite</span>
      </p>
    </footer>
  </div>
"##,
        greeting = greeting,
        site_url = site.base_url,
        support_email = site.support_email,
    )
}

/// Announcement body personalised with the recipient's unsubscribe link.
pub fn poem_announcement_email(
    site: &SiteSettings,
    poem: &Poem,
    recipient: &SubscriberEmail,
) -> String {
    format!(
        r##"
  <div style="max-width:600px;margin:0 auto;background:#fff;border-radius:12px;box-shadow:0 2px 12px #ccb7f4;padding:32px 24px 20px 24px;font-family:'Segoe UI',Arial,sans-serif;">
    <header style="text-align:center;margin-bottom:32px;">
      <h1 style="color:#7c3aed;font-size:2.1em;margin:0;font-weight:bold;letter-spacing:-1px;">PoemSites Announcement</h1>
      <p style="color:#7c3aed;font-size:1.07em;margin-top:10px;">A New Poem Has Been Published!</p>
    </header>

    <section style="margin-bottom:28px;">
      <h2 style="font-size:1.35em;color:#4b2774;margin-bottom:10px;">"{title}"</h2>
      <p style="color:#6d28d9;font-size:1.08em;margin:0 0 18px 0;"><b>By:</b> {author}</p>
      <blockquote style="background:#f3e8ff;padding:22px 24px;border-left:5px solid #a78bfa;border-radius:8px;color:#44337a;font-size:1.1em;margin:0 0 15px 0;line-height:1.6;">
        {excerpt}
      </blockquote>
      <div style="margin:20px 0;">
        <a href="{poem_link}" style="display:inline-block;background:#7c3aed;color:#fff;text-decoration:none;font-weight:600;padding:12px 28px;border-radius:6px;font-size:1em;box-shadow:0 1px 4px #e9d5ff;">Read the Full Poem</a>
      </div>
    </section>

    <hr style="border:none;border-top:1px solid #f3e8ff;margin:28px 0 18px 0;"/>

    <footer style="text-align:center;color:#6c4a84;font-size:0.97em;">
      <p style="margin-bottom:8px;">Thank you for being a valued member of the PoemSites community.<br/>We hope this poem inspires you today!</p>
      <p style="margin-bottom:3px;">
        <small>If you wish to unsubscribe from future poem notifications, <a href="{unsubscribe_link}" style="color:#7c3aed;text-decoration:underline;">click here</a>.</small>
      </p>
      <p style="margin-top:18px;font-size:0.93em;color:#b197d9;">
        &mdash; Team PoemSite
      </p>
    </footer>
  </div>
"##,
        title = poem.title,
        author = poem.author,
        excerpt = poem_excerpt(&poem.content),
        poem_link = format!("{}/poem/{}", site.base_url, poem.slug),
        unsubscribe_link = unsubscribe_link(site, recipient),
    )
}
