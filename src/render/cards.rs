//! Per-domain card templates.

use crate::arrange::{classify, countdown, Bucket};
use crate::model::{Entity, Registration};
use crate::render::{esc, format_date, format_time, Html, RenderCtx};
use crate::schema::{DomainSchema, EntityKind};

const TEAM_PREVIEW: usize = 2;
const TECH_PREVIEW: usize = 3;

/// Grid card for any domain, dispatched on the schema's entity kind.
pub fn card(w: &mut Html, e: &Entity, schema: &DomainSchema, ctx: &RenderCtx) {
    match schema.kind {
        EntityKind::Achievement => achievement(w, e, schema),
        EntityKind::Event => {
            let bucket = classify(e.schedule.as_ref(), ctx.now);
            match bucket {
                Bucket::Past => past_event(w, e, schema),
                _ => event(w, e, schema, bucket),
            }
        }
        EntityKind::News => news(w, e, schema),
        EntityKind::Project => project(w, e, schema),
        EntityKind::Member => member(w, e, schema),
    }
}

fn open_card(w: &mut Html, class: &str, e: &Entity) {
    w.push(format!(
        "<article class=\"{}\" data-id=\"{}\" data-category=\"{}\">",
        class,
        esc(e.id.as_str()),
        esc(&e.category)
    ));
}

fn badge(w: &mut Html, e: &Entity, schema: &DomainSchema) {
    if e.category.is_empty() {
        return;
    }
    w.push(format!("<span class=\"category-badge category-{}\">", esc(&e.category)));
    w.text(&schema.category_label(&e.category));
    w.push("</span>");
}

/// "A, B +3 more"
pub fn preview_list(items: &[String], shown: usize) -> String {
    let mut out = items.iter().take(shown).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > shown {
        out.push_str(&format!(" +{} more", items.len() - shown));
    }
    out
}

fn tags(w: &mut Html, items: &[String]) {
    if items.is_empty() {
        return;
    }
    w.push("<ul class=\"tags\">");
    for t in items {
        w.push("<li class=\"tag\">");
        w.text(t);
        w.push("</li>");
    }
    w.push("</ul>");
}

fn details_link(w: &mut Html, e: &Entity) {
    w.push(format!(
        "<button class=\"view-details\" data-detail-id=\"{}\">View Details</button>",
        esc(e.id.as_str())
    ));
}

pub fn achievement(w: &mut Html, e: &Entity, schema: &DomainSchema) {
    open_card(w, "achievement-card", e);
    badge(w, e, schema);
    if let Some(year) = e.year {
        w.push(format!("<span class=\"year-badge\">{}</span>", year));
    }
    w.elem("h3", "card-title", &e.title);
    w.elem("div", "achievement-result", &e.text_or_empty("achievement"));
    let blurb = e
        .text("brief_description")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| e.text_or_empty("description"));
    w.elem("p", "card-summary", &blurb);
    w.elem("div", "team-preview", &preview_list(&e.list("team_members"), TEAM_PREVIEW));
    details_link(w, e);
    w.push("</article>");
}

pub fn registration(w: &mut Html, e: &Entity, reg: &Registration) {
    w.push(format!(
        "<div class=\"registration\"><span class=\"registered\">{}/{} Registered</span>",
        reg.registered, reg.capacity
    ));
    w.push(format!(
        "<div class=\"registration-progress\"><div class=\"registration-progress-bar\" style=\"width: {:.0}%\"></div></div>",
        reg.percent()
    ));
    if reg.is_full() {
        w.push(format!(
            "<button class=\"register-btn full\" data-event-id=\"{}\" disabled>Fully Booked</button>",
            esc(e.id.as_str())
        ));
    } else {
        w.push(format!(
            "<button class=\"register-btn\" data-event-id=\"{}\">Register Interest</button>",
            esc(e.id.as_str())
        ));
    }
    w.push("</div>");
}

fn when(w: &mut Html, e: &Entity) {
    let Some(s) = e.schedule else {
        return;
    };
    w.push("<div class=\"event-when\">");
    w.elem("span", "event-date", &format_date(s.start.date()));
    w.elem("span", "event-time", &format_time(s.start.time()));
    if s.end > s.start {
        w.push(" - ");
        if s.end.date() != s.start.date() {
            w.elem("span", "event-end-date", &format_date(s.end.date()));
        }
        w.elem("span", "event-end-time", &format_time(s.end.time()));
    }
    w.push("</div>");
}

pub fn event(w: &mut Html, e: &Entity, schema: &DomainSchema, bucket: Bucket) {
    let class = match bucket {
        Bucket::Ongoing => "event-card ongoing",
        _ => "event-card",
    };
    open_card(w, class, e);
    badge(w, e, schema);
    if bucket == Bucket::Ongoing {
        w.push("<span class=\"live-badge\">HAPPENING NOW</span>");
    }
    w.elem("h4", "card-title", &e.title);
    when(w, e);
    w.elem("p", "card-summary", &e.text_or_empty("brief"));
    w.elem("span", "event-venue", &e.text_or_empty("venue"));
    w.elem("span", "event-organizer", &e.text_or_empty("organizer"));
    if let Some(reg) = &e.registration {
        registration(w, e, reg);
    }
    details_link(w, e);
    w.push("</article>");
}

/// Gallery tile for a finished event.
pub fn past_event(w: &mut Html, e: &Entity, schema: &DomainSchema) {
    open_card(w, "past-event-card", e);
    let image = e.text_or_empty("image");
    if !image.is_empty() {
        w.push(format!(
            "<img class=\"past-event-image\" src=\"{}\" alt=\"{}\">",
            esc(&image),
            esc(&e.title)
        ));
    }
    badge(w, e, schema);
    w.elem("h4", "card-title", &e.title);
    if let Some(s) = e.schedule {
        w.elem("span", "event-date", &format_date(s.start.date()));
    }
    details_link(w, e);
    w.push("</article>");
}

pub fn news(w: &mut Html, e: &Entity, schema: &DomainSchema) {
    let important = e.fields.get("important").and_then(|v| v.as_bool()).unwrap_or(false);
    open_card(w, if important { "news-card important" } else { "news-card" }, e);
    badge(w, e, schema);
    if let Some(d) = e.date {
        w.elem("time", "news-date", &format_date(d));
    }
    w.elem("h3", "card-title", &e.title);
    w.elem("p", "card-summary", &e.text_or_empty("summary"));
    let byline = e
        .text("author")
        .or_else(|| e.text("source"))
        .unwrap_or_default();
    w.elem("span", "news-byline", &byline);
    tags(w, &e.list("tags"));
    details_link(w, e);
    w.push("</article>");
}

pub fn project(w: &mut Html, e: &Entity, schema: &DomainSchema) {
    open_card(w, "project-card", e);
    badge(w, e, schema);
    if let Some(year) = e.year {
        w.push(format!("<span class=\"year-badge\">{}</span>", year));
    }
    w.elem("h3", "card-title", &e.title);
    w.elem("p", "card-summary", &e.text_or_empty("shortDescription"));
    let tech = e.list("technologies");
    tags(w, &tech.iter().take(TECH_PREVIEW).cloned().collect::<Vec<_>>());
    if tech.len() > TECH_PREVIEW {
        w.push(format!("<span class=\"more-tags\">+{}</span>", tech.len() - TECH_PREVIEW));
    }
    w.elem("span", "project-status", &e.text_or_empty("status"));
    details_link(w, e);
    w.push("</article>");
}

pub fn member(w: &mut Html, e: &Entity, schema: &DomainSchema) {
    open_card(w, "member-card", e);
    let photo = e.text_or_empty("photo");
    if !photo.is_empty() {
        w.push(format!(
            "<img class=\"member-photo\" src=\"{}\" alt=\"{}\">",
            esc(&photo),
            esc(&e.title)
        ));
    }
    w.elem("h3", "card-title", &e.title);
    let role = e
        .text("role")
        .or_else(|| e.text("designation"))
        .unwrap_or_default();
    w.elem("p", "member-role", &role);
    w.elem("p", "member-department", &e.text_or_empty("department"));
    if schema.categories.iter().any(|c| c.key == e.category) {
        badge(w, e, schema);
    }
    tags(w, &e.list("skills"));
    details_link(w, e);
    w.push("</article>");
}

pub fn timeline_item(w: &mut Html, e: &Entity, schema: &DomainSchema, primary: bool) {
    let class = if primary { "timeline-item primary" } else { "timeline-item" };
    open_card(w, class, e);
    badge(w, e, schema);
    w.elem("h4", "card-title", &e.title);
    w.elem("div", "achievement-result", &e.text_or_empty("achievement"));
    if primary {
        w.elem("p", "card-summary", &e.text_or_empty("description"));
    }
    w.push("</article>");
}

/// Featured strip card. Events get a countdown while they have not started.
pub fn featured(w: &mut Html, e: &Entity, schema: &DomainSchema, ctx: &RenderCtx) {
    open_card(w, "featured-card", e);
    badge(w, e, schema);
    w.elem("h3", "card-title", &e.title);
    match schema.kind {
        EntityKind::Event => {
            when(w, e);
            w.elem("p", "card-summary", &e.text_or_empty("description"));
            if let Some(c) = e.schedule.and_then(|s| countdown(s.start, ctx.now)) {
                w.push(format!(
                    "<div class=\"countdown\" data-days=\"{}\">{}d {}h {}m {}s</div>",
                    c.days, c.days, c.hours, c.minutes, c.seconds
                ));
            }
            if let Some(reg) = &e.registration {
                registration(w, e, reg);
            }
        }
        _ => {
            if let Some(year) = e.year {
                w.push(format!("<span class=\"year-badge\">{}</span>", year));
            }
            w.elem("div", "achievement-result", &e.text_or_empty("achievement"));
            w.elem("div", "team-preview", &preview_list(&e.list("team_members"), TEAM_PREVIEW));
        }
    }
    details_link(w, e);
    w.push("</article>");
}
