use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;
use robosite::error::StoreError;
use robosite::forms::{validate_contact, ContactInput, SubscriberStore};
use robosite::loader::{source_from_config, Source};
use robosite::logging::{json_log, log, obj, v_num, v_str, Domain, Level, ProfileScope};
use robosite::page::{containers_for, Clock, PageController, DETAIL};
use robosite::{Config, DomainSchema, ValidationError};
use serde_json::json;
use std::env;
use std::fs;
use std::path::Path;

const USAGE: &str = "usage:
  robosite build [--now YYYY-MM-DDTHH:MM]
  robosite query <domain> [--facet name=value]... [--search text] [--now ...]
  robosite detail <domain> <id>
  robosite subscribe <email>
  robosite contact <name> <email> <subject> <message>
domains: achievements events club_news industry_news projects faculty core_team team_members alumni";

/// Flags shared by the page commands.
struct PageArgs {
    positional: Vec<String>,
    facets: Vec<(String, String)>,
    search: Option<String>,
    clock: Clock,
}

fn parse_page_args(args: &[String]) -> Result<PageArgs> {
    let mut out = PageArgs {
        positional: Vec::new(),
        facets: Vec::new(),
        search: None,
        clock: Clock::System,
    };
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--facet" => {
                let pair = it.next().ok_or_else(|| anyhow!("--facet needs name=value"))?;
                let (name, value) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--facet needs name=value, got {}", pair))?;
                out.facets.push((name.to_string(), value.to_string()));
            }
            "--search" => {
                out.search = Some(it.next().ok_or_else(|| anyhow!("--search needs text"))?.clone());
            }
            "--now" => {
                let raw = it.next().ok_or_else(|| anyhow!("--now needs a timestamp"))?;
                let t = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
                    .with_context(|| format!("bad --now {}", raw))?;
                out.clock = Clock::Fixed(t);
            }
            _ => out.positional.push(arg.clone()),
        }
    }
    Ok(out)
}

fn schema_arg(cfg: &Config, name: Option<&String>) -> Result<DomainSchema> {
    let name = name.ok_or_else(|| anyhow!("missing domain\n{}", USAGE))?;
    DomainSchema::by_name(name, cfg.caps).ok_or_else(|| anyhow!("unknown domain {}\n{}", name, USAGE))
}

async fn load_page(cfg: &Config, source: &dyn Source, schema: DomainSchema, clock: Clock) -> PageController {
    let mut page = PageController::new(schema, clock, cfg.featured_cap);
    page.initialize(source).await;
    page
}

async fn build(cfg: &Config, source: &dyn Source, clock: Clock) -> Result<()> {
    let _prof = ProfileScope::new("build");
    let mut written = 0usize;
    for schema in DomainSchema::all(cfg.caps) {
        let name = schema.name;
        let page = load_page(cfg, source, schema, clock).await;
        let dir = cfg.out_dir.join(name);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        for container in containers_for(page.schema()) {
            if container == DETAIL {
                continue;
            }
            if let Some(fragment) = page.container(container) {
                let path = dir.join(format!("{}.html", container));
                fs::write(&path, fragment.as_str()).with_context(|| format!("writing {}", path.display()))?;
                written += 1;
            }
        }
        json_log(
            "build_page",
            obj(&[
                ("page", v_str(name)),
                ("records", v_num(page.state().collection.len() as f64)),
                ("status", v_str(&format!("{:?}", page.state().status))),
            ]),
        );
    }
    println!("wrote {} fragments under {}", written, cfg.out_dir.display());
    Ok(())
}

async fn query(cfg: &Config, source: &dyn Source, args: PageArgs) -> Result<()> {
    let schema = schema_arg(cfg, args.positional.first())?;
    let mut page = load_page(cfg, source, schema, args.clock).await;
    for (name, value) in &args.facets {
        page.select(name, value);
    }
    if let Some(text) = &args.search {
        page.search(text);
    }
    for (name, fragment) in page.shell().iter() {
        if name == DETAIL {
            continue;
        }
        println!("<!-- {} -->\n{}", name, fragment.as_str());
    }
    Ok(())
}

async fn detail(cfg: &Config, source: &dyn Source, args: PageArgs) -> Result<()> {
    let schema = schema_arg(cfg, args.positional.first())?;
    let id = args.positional.get(1).ok_or_else(|| anyhow!("missing id\n{}", USAGE))?;
    let mut page = load_page(cfg, source, schema, args.clock).await;
    if !page.open_detail(id) {
        eprintln!("no {} entry with id {}", page.schema().name, id);
        std::process::exit(2);
    }
    if let Some(fragment) = page.container(DETAIL) {
        println!("{}", fragment.as_str());
    }
    Ok(())
}

fn report_invalid(err: &ValidationError) -> ! {
    for f in &err.fields {
        eprintln!("{}: {}", f.field, f.message);
    }
    std::process::exit(2);
}

fn subscribe(cfg: &Config, email: Option<&String>) -> Result<()> {
    let email = email.ok_or_else(|| anyhow!("missing email\n{}", USAGE))?;
    let mut store = SubscriberStore::open(&cfg.subscribers_db)?;
    store.init()?;
    match store.subscribe(email) {
        Ok(()) => {
            println!("subscribed {}", email.trim());
            Ok(())
        }
        Err(StoreError::Invalid(v)) => report_invalid(&v),
        Err(e) => Err(e.into()),
    }
}

fn contact(args: &[String]) -> Result<()> {
    if args.len() < 4 {
        bail!("contact needs <name> <email> <subject> <message>\n{}", USAGE);
    }
    let input = ContactInput {
        name: args[0].clone(),
        email: args[1].clone(),
        subject: args[2].clone(),
        message: args[3..].join(" "),
    };
    match validate_contact(&input) {
        Ok(msg) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "accepted": msg }))?);
            Ok(())
        }
        Err(v) => report_invalid(&v),
    }
}

fn ensure_data_dir(cfg: &Config) {
    if cfg.base_url.is_none() && !Path::new(&cfg.data_dir).is_dir() {
        log(
            Level::Warn,
            Domain::System,
            "data_dir_missing",
            obj(&[("data_dir", v_str(&cfg.data_dir.display().to_string()))]),
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };
    let rest = &args[1..];

    json_log(
        "startup",
        obj(&[
            ("command", v_str(command)),
            ("data_dir", v_str(&cfg.data_dir.display().to_string())),
            ("base_url", v_str(cfg.base_url.as_deref().unwrap_or(""))),
        ]),
    );

    match command.as_str() {
        "build" | "query" | "detail" => {
            ensure_data_dir(&cfg);
            let source = source_from_config(&cfg)?;
            let page_args = parse_page_args(rest)?;
            match command.as_str() {
                "build" => build(&cfg, source.as_ref(), page_args.clock).await,
                "query" => query(&cfg, source.as_ref(), page_args).await,
                _ => detail(&cfg, source.as_ref(), page_args).await,
            }
        }
        "subscribe" => subscribe(&cfg, rest.first()),
        "contact" => contact(rest),
        other => {
            eprintln!("unknown command {}\n{}", other, USAGE);
            std::process::exit(1);
        }
    }
}
