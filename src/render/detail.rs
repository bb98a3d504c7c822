//! Detail modal body, one branch per `Detail` variant plus a generic
//! key/value listing.

use crate::model::{
    CompetitionDetail, Detail, DetailValue, Entity, EventDetail, MemberDetail, NewsDetail,
    ProjectDetail, ResearchDetail,
};
use crate::render::{esc, format_date, format_datetime, Fragment, Html};
use crate::schema::{humanize, DomainSchema};

pub fn render_detail(e: &Entity, schema: &DomainSchema) -> Fragment {
    let mut w = Html::new();
    w.push(format!(
        "<div class=\"detail-modal\" role=\"dialog\" data-id=\"{}\">",
        esc(e.id.as_str())
    ));
    w.push("<header class=\"detail-header\">");
    if !e.category.is_empty() {
        w.elem("span", "category-badge", &schema.category_label(&e.category));
    }
    w.elem("h2", "detail-title", &e.title);
    if let Some(year) = e.year {
        w.push(format!("<span class=\"year-badge\">{}</span>", year));
    }
    w.push("</header><div class=\"detail-body\">");

    match &e.detail {
        Detail::Competition(d) => competition(&mut w, e, d),
        Detail::Research(d) => research(&mut w, e, d),
        Detail::Event(d) => event(&mut w, e, d),
        Detail::Project(d) => project(&mut w, d),
        Detail::News(d) => news(&mut w, e, d),
        Detail::Member(d) => member(&mut w, d),
        Detail::Generic(entries) => {
            overview(&mut w, e);
            generic(&mut w, entries);
        }
    }

    w.push("</div><button class=\"modal-close\" data-dismiss=\"close\">&times;</button></div>");
    w.finish()
}

fn row(w: &mut Html, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    w.push("<div class=\"detail-row\"><span class=\"detail-label\">");
    w.text(label);
    w.push(":</span> <span class=\"detail-value\">");
    w.text(value);
    w.push("</span></div>");
}

fn list(w: &mut Html, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    w.push("<div class=\"detail-list\">");
    w.elem("h4", "detail-label", label);
    w.push("<ul>");
    for item in items {
        w.push("<li>");
        w.text(item);
        w.push("</li>");
    }
    w.push("</ul></div>");
}

fn link(w: &mut Html, label: &str, href: Option<&str>) {
    let Some(href) = href.filter(|h| !h.is_empty()) else {
        return;
    };
    w.push(format!(
        "<a class=\"detail-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">",
        esc(href)
    ));
    w.text(label);
    w.push("</a>");
}

/// Fields every achievement shows above its category-specific block.
fn overview(w: &mut Html, e: &Entity) {
    w.elem("div", "achievement-result", &e.text_or_empty("achievement"));
    w.elem("p", "detail-description", &e.text_or_empty("description"));
    list(w, "Team Members", &e.list("team_members"));
}

fn competition(w: &mut Html, e: &Entity, d: &CompetitionDetail) {
    overview(w, e);
    w.push("<section class=\"detail-section competition\">");
    row(w, "Competition", &d.competition_name);
    row(w, "Organizer", &d.organizer);
    row(w, "Location", &d.location);
    row(w, "Prize", &d.prize);
    list(w, "Highlights", &d.highlights);
    list(w, "Technologies", &d.technologies);
    w.push("</section>");
}

fn research(w: &mut Html, e: &Entity, d: &ResearchDetail) {
    overview(w, e);
    w.push("<section class=\"detail-section research\">");
    row(w, "Journal", &d.journal_name);
    if let Some(f) = d.impact_factor {
        row(w, "Impact Factor", &f.to_string());
    }
    if let Some(doi) = &d.doi {
        row(w, "DOI", doi);
    }
    if let Some(n) = d.citation_count {
        row(w, "Citations", &n.to_string());
    }
    list(w, "Highlights", &d.highlights);
    list(w, "Technologies", &d.technologies);
    w.push("</section>");
}

fn event(w: &mut Html, e: &Entity, d: &EventDetail) {
    if !d.image.is_empty() {
        w.push(format!(
            "<img class=\"detail-image\" src=\"{}\" alt=\"{}\">",
            esc(&d.image),
            esc(&e.title)
        ));
    }
    let description = if d.description.is_empty() { &d.brief } else { &d.description };
    w.elem("p", "detail-description", description);
    if let Some(s) = e.schedule {
        row(w, "Starts", &format_datetime(s.start));
        if s.end > s.start {
            row(w, "Ends", &format_datetime(s.end));
        }
    }
    row(w, "Venue", &d.venue);
    row(w, "Organizer", &d.organizer);
    if let Some(reg) = &e.registration {
        row(w, "Registered", &format!("{}/{}", reg.registered, reg.capacity));
    }
}

fn project(w: &mut Html, d: &ProjectDetail) {
    let description = if d.long_description.is_empty() {
        &d.short_description
    } else {
        &d.long_description
    };
    w.elem("p", "detail-description", description);
    row(w, "Status", &d.status);
    row(w, "Duration", &d.duration);
    list(w, "Technologies", &d.technologies);
    list(w, "Tools", &d.tools);
    list(w, "Team", &d.team);
    list(w, "Achievements", &d.achievements);
    if !d.images.is_empty() {
        w.push("<div class=\"detail-gallery\">");
        for src in &d.images {
            w.push(format!("<img src=\"{}\" alt=\"\">", esc(src)));
        }
        w.push("</div>");
    }
    link(w, "Source Code", d.github.as_deref());
    link(w, "Live Demo", d.demo.as_deref());
}

fn news(w: &mut Html, e: &Entity, d: &NewsDetail) {
    if let Some(date) = e.date {
        w.elem("time", "news-date", &format_date(date));
    }
    let body = if d.content.is_empty() { &d.summary } else { &d.content };
    w.elem("p", "detail-description", body);
    if let Some(author) = &d.author {
        row(w, "Author", author);
    }
    if let Some(source) = &d.source {
        row(w, "Source", source);
    }
    list(w, "Tags", &d.tags);
    link(w, "Read More", d.read_more_link.as_deref());
}

fn member(w: &mut Html, d: &MemberDetail) {
    let role = if d.role.is_empty() { &d.designation } else { &d.role };
    row(w, "Role", role);
    row(w, "Department", &d.department);
    if let Some(year) = d.year.as_ref().and_then(crate::model::value_text) {
        row(w, "Year", &year);
    }
    if let Some(q) = d.message.as_ref().or(d.quote.as_ref()) {
        w.elem("blockquote", "member-quote", q);
    }
    list(w, "Skills", &d.skills);
    list(w, "Responsibilities", &d.responsibilities);
    if let Some(email) = &d.email {
        let href = format!("mailto:{}", email);
        link(w, email, Some(href.as_str()));
    }
    link(w, "LinkedIn", d.linkedin.as_deref());
    link(w, "GitHub", d.github.as_deref());
    link(w, "ResearchGate", d.research_gate.as_deref());
}

/// Arbitrary payload: scalar keys as rows, list keys as bullet lists.
fn generic(w: &mut Html, entries: &[(String, DetailValue)]) {
    if entries.is_empty() {
        return;
    }
    w.push("<section class=\"detail-section generic\">");
    for (key, value) in entries {
        let label = humanize(key);
        match value {
            DetailValue::Text(text) => row(w, &label, text),
            DetailValue::List(items) => list(w, &label, items),
        }
    }
    w.push("</section>");
}
