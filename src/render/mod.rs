//! Renderer: grouped views -> HTML fragments, and the page shell whose
//! named containers those fragments replace wholesale.

pub mod cards;
pub mod detail;

pub use detail::render_detail;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

use crate::arrange::{Bucket, GroupedView, TemporalView, YearGroup};
use crate::logging::{log, log_render, obj, v_str, Domain, Level};
use crate::model::Entity;
use crate::schema::{humanize, DomainSchema, Facet, FacetKind, ALL};

// ===== Writer =====

/// Append-only markup writer. Text goes through `text`, which escapes.
#[derive(Debug, Default)]
pub struct Html {
    buf: String,
}

impl Html {
    pub fn new() -> Self {
        Self { buf: String::with_capacity(4 * 1024) }
    }

    pub fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }

    pub fn text(&mut self, s: &str) {
        self.buf.push_str(&esc(s));
    }

    /// `<tag class="..">escaped text</tag>`; skipped when `text` is empty.
    pub fn elem(&mut self, tag: &str, class: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push(format!("<{} class=\"{}\">", tag, class));
        self.text(text);
        self.push(format!("</{}>", tag));
    }

    pub fn finish(self) -> Fragment {
        Fragment(self.buf)
    }
}

/// Escape text for element content and quoted attribute values.
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A rendered presentation tree for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment(s)
    }
}

// ===== Formatting helpers =====

pub fn format_date(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%I:%M %p").to_string()
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    format!("{} {}", format_date(dt.date()), format_time(dt.time()))
}

// ===== Empty and error states =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The loaded collection itself is empty.
    NoData,
    /// Records exist but none survive the current filters.
    NoMatches,
    /// Nothing selected, but this slice of the collection is empty.
    NoneInBucket,
}

impl EmptyReason {
    pub fn message(&self, noun: &str) -> String {
        match self {
            EmptyReason::NoData => format!("No {} available yet. Check back soon!", noun),
            EmptyReason::NoMatches => {
                format!("No {} match your filters. Try changing your selection.", noun)
            }
            EmptyReason::NoneInBucket => format!("No {} at the moment.", noun),
        }
    }

    fn class(&self) -> &'static str {
        match self {
            EmptyReason::NoData => "empty-state no-data",
            EmptyReason::NoMatches => "empty-state no-matches",
            EmptyReason::NoneInBucket => "empty-state none-in-bucket",
        }
    }
}

pub fn empty_state(reason: EmptyReason, noun: &str) -> Fragment {
    let mut w = Html::new();
    w.push(format!("<div class=\"{}\">", reason.class()));
    w.elem("p", "empty-message", &reason.message(noun));
    w.push("</div>");
    w.finish()
}

pub fn render_error(message: &str) -> Fragment {
    let mut w = Html::new();
    w.push("<div class=\"error-state\" role=\"alert\">");
    w.elem("h3", "error-title", "Failed to load content");
    w.elem("p", "error-message", message);
    w.push("</div>");
    w.finish()
}

// ===== Views =====

/// What the renderer needs besides the view itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    /// The unfiltered collection was empty.
    pub source_empty: bool,
    /// A facet or search narrows the collection.
    pub filters_active: bool,
    pub now: NaiveDateTime,
}

impl RenderCtx {
    pub fn empty_reason(&self) -> EmptyReason {
        if self.source_empty {
            EmptyReason::NoData
        } else if self.filters_active {
            EmptyReason::NoMatches
        } else {
            EmptyReason::NoneInBucket
        }
    }
}

pub fn render_view(view: &GroupedView<'_>, schema: &DomainSchema, ctx: &RenderCtx) -> Fragment {
    if view.is_empty() {
        return empty_state(ctx.empty_reason(), schema.empty_noun);
    }

    let mut w = Html::new();
    match view {
        GroupedView::Categories(groups) => {
            for g in groups.iter().filter(|g| !g.entities.is_empty()) {
                w.push(format!(
                    "<section class=\"category-section\" data-category=\"{}\">",
                    esc(&g.key)
                ));
                w.push("<h3 class=\"section-title\">");
                w.text(&g.title);
                w.push(format!(" <span class=\"count\">({})</span></h3>", g.entities.len()));
                grid(&mut w, &g.entities, schema, ctx);
                w.push("</section>");
            }
        }
        GroupedView::Flat(items) => grid(&mut w, items, schema, ctx),
        GroupedView::Temporal(t) => {
            for bucket in [Bucket::Upcoming, Bucket::Ongoing, Bucket::Past] {
                w.push(format!("<section class=\"events-{}\">", bucket.as_str()));
                w.push(render_bucket(t, bucket, schema, ctx).into_string());
                w.push("</section>");
            }
        }
    }
    w.finish()
}

/// One temporal bucket, capped for display. Each bucket carries its own
/// empty state so the page can mount them in separate containers.
pub fn render_bucket(view: &TemporalView<'_>, bucket: Bucket, schema: &DomainSchema, ctx: &RenderCtx) -> Fragment {
    let shown = view.displayed(bucket);
    if shown.is_empty() {
        let noun = format!("{} {}", bucket.as_str(), schema.empty_noun);
        return empty_state(ctx.empty_reason(), &noun);
    }

    let mut w = Html::new();
    w.push(format!("<div class=\"card-grid {}\">", bucket.as_str()));
    for e in shown {
        match bucket {
            Bucket::Past => cards::past_event(&mut w, e, schema),
            _ => cards::event(&mut w, e, schema, bucket),
        }
    }
    w.push("</div>");
    if view.bucket(bucket).len() > shown.len() {
        w.push(format!(
            "<p class=\"more-note\">Showing {} of {}</p>",
            shown.len(),
            view.bucket(bucket).len()
        ));
    }
    w.finish()
}

fn grid(w: &mut Html, items: &[&Entity], schema: &DomainSchema, ctx: &RenderCtx) {
    w.push("<div class=\"card-grid\">");
    for e in items {
        cards::card(w, e, schema, ctx);
    }
    w.push("</div>");
}

pub fn render_timeline(years: &[YearGroup<'_>], schema: &DomainSchema) -> Fragment {
    if years.is_empty() {
        return empty_state(EmptyReason::NoData, "timeline entries");
    }
    let mut w = Html::new();
    w.push("<div class=\"timeline\">");
    for year in years {
        w.push(format!("<div class=\"timeline-year\" data-year=\"{}\">", year.year));
        w.push(format!("<div class=\"year-marker\">{}", year.year));
        if year.latest {
            w.push("<span class=\"latest-badge\">LATEST</span>");
        }
        w.push("</div>");
        for (i, e) in year.entities.iter().enumerate() {
            cards::timeline_item(&mut w, e, schema, i == 0);
        }
        w.push("</div>");
    }
    w.push("</div>");
    w.finish()
}

pub fn render_featured(items: &[&Entity], schema: &DomainSchema, ctx: &RenderCtx) -> Fragment {
    if items.is_empty() {
        let noun = format!("featured {}", schema.empty_noun);
        return empty_state(EmptyReason::NoData, &noun);
    }
    let mut w = Html::new();
    w.push("<div class=\"featured-strip\">");
    for e in items {
        cards::featured(&mut w, e, schema, ctx);
    }
    w.push("</div>");
    w.finish()
}

/// Selector for one facet: an "All" option followed by every value, each
/// with the number of matches it would produce.
pub fn render_facet(facet: &Facet, counts: &[(String, usize)], selected: &str, schema: &DomainSchema) -> Fragment {
    let mut w = Html::new();
    w.push(format!("<div class=\"filter-group\" data-facet=\"{}\">", esc(facet.name)));
    for (value, n) in counts {
        let label = if value == ALL {
            "All".to_string()
        } else {
            match facet.kind {
                FacetKind::Category => schema.category_label(value),
                FacetKind::DateWindow => humanize(value),
                FacetKind::Field(_) => value.clone(),
            }
        };
        let class = if value == selected { "filter-btn active" } else { "filter-btn" };
        w.push(format!("<button class=\"{}\" data-value=\"{}\">", class, esc(value)));
        w.text(&label);
        w.push(format!(" <span class=\"count\">{}</span></button>", n));
    }
    w.push("</div>");
    w.finish()
}

// ===== Shell =====

/// Named mount points of one page. Replacing a container swaps its whole
/// fragment; a name the page never declared is ignored.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    page: String,
    containers: IndexMap<String, Fragment>,
}

impl Shell {
    pub fn new(page: &str, names: &[&str]) -> Self {
        Self {
            page: page.to_string(),
            containers: names.iter().map(|n| (n.to_string(), Fragment::default())).collect(),
        }
    }

    pub fn replace(&mut self, name: &str, fragment: Fragment) -> bool {
        let bytes = fragment.len();
        match self.containers.get_mut(name) {
            Some(slot) => {
                *slot = fragment;
                log_render(&self.page, name, bytes, true);
                true
            }
            None => {
                log(
                    Level::Debug,
                    Domain::Render,
                    "missing_container",
                    obj(&[("page", v_str(&self.page)), ("container", v_str(name))]),
                );
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.containers.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.containers.iter().map(|(k, v)| (k.as_str(), v))
    }
}
