use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// One project card in the projects grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    /// Comma-separated tech list; chip tokens match against this string.
    pub tech: String,
    pub blurb: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Body payload for a section. Components key off the variant: the hero
/// drives the typing banner, a projects body drives the filter, a contact
/// body activates the form. Sections whose payload a component needs but
/// which the content omits leave that component disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionBody {
    Hero {
        headline: String,
        typing_words: Vec<String>,
        lead: String,
    },
    Text {
        paragraphs: Vec<String>,
    },
    Projects {
        chips: Vec<String>,
        projects: Vec<Project>,
    },
    Contact {
        intro: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub id: String,
    pub label: String,
    pub body: SectionBody,
}

/// Everything the page displays, loaded from RON or built in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContent {
    pub site_title: String,
    pub author: String,
    pub sections: Vec<SectionContent>,
}

impl PageContent {
    /// Load content from `path_hint`, falling back to the built-in page.
    /// Tries the path as given, then next to the executable.
    pub fn load(path_hint: &str) -> Self {
        for candidate in Self::candidates(path_hint) {
            if !candidate.exists() {
                continue;
            }
            match fs::read_to_string(&candidate) {
                Ok(raw) => match ron::from_str::<PageContent>(&raw) {
                    Ok(content) => {
                        info!(path = %candidate.display(), "Loaded page content");
                        return content;
                    }
                    Err(e) => {
                        warn!(path = %candidate.display(), "Failed to parse content: {}", e);
                    }
                },
                Err(e) => {
                    warn!(path = %candidate.display(), "Failed to read content: {}", e);
                }
            }
        }

        info!("Using built-in page content");
        Self::default()
    }

    fn candidates(path_hint: &str) -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(path_hint)];
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join(path_hint));
        }
        candidates
    }

    /// Projects from the first projects section, or nothing.
    pub fn projects(&self) -> &[Project] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Projects { projects, .. } => Some(projects.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Chip tokens from the first projects section, or nothing.
    pub fn chips(&self) -> &[String] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Projects { chips, .. } => Some(chips.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Words for the hero typing banner, or nothing when there is no hero.
    pub fn typing_words(&self) -> &[String] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Hero { typing_words, .. } => Some(typing_words.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Id of the contact section, when the page has one.
    pub fn contact_section_id(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match &s.body {
            SectionBody::Contact { .. } => Some(s.id.as_str()),
            _ => None,
        })
    }

    /// Id of the projects section, when the page has one.
    pub fn projects_section_id(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match &s.body {
            SectionBody::Projects { .. } => Some(s.id.as_str()),
            _ => None,
        })
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }
}

impl Default for PageContent {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            author: default_author(),
            sections: default_sections(),
        }
    }
}

fn default_site_title() -> String {
    "chartman.dev".to_string()
}

fn default_author() -> String {
    "Casey Hartman".to_string()
}

fn default_sections() -> Vec<SectionContent> {
    vec![
        SectionContent {
            id: "home".to_string(),
            label: "Home".to_string(),
            body: SectionBody::Hero {
                headline: "Casey Hartman".to_string(),
                typing_words: vec![
                    "Developer.".to_string(),
                    "Learner.".to_string(),
                    "Problem-solver.".to_string(),
                ],
                lead: "Systems-minded developer building fast, dependable tools for the \
                       terminal and the network. Currently deep in Rust, async runtimes, \
                       and the occasional lost weekend of profiling."
                    .to_string(),
            },
        },
        SectionContent {
            id: "about".to_string(),
            label: "About".to_string(),
            body: SectionBody::Text {
                paragraphs: vec![
                    "I started out writing firmware for irrigation controllers, where a \
                     crash meant a flooded field rather than a stack trace. That left me \
                     with strong opinions about error handling and a lasting affection for \
                     systems that fail loudly in development and gracefully in production."
                        .to_string(),
                    "These days I work mostly on developer tooling and network services. \
                     I like problems that sit close to the metal but still ship to real \
                     people: protocol plumbing, caching layers, terminal interfaces that \
                     respond in a frame instead of a beat."
                        .to_string(),
                    "Away from a keyboard I restore old film cameras, which is debugging \
                     with springs. The two hobbies are more alike than either community \
                     would admit."
                        .to_string(),
                ],
            },
        },
        SectionContent {
            id: "skills".to_string(),
            label: "Skills".to_string(),
            body: SectionBody::Text {
                paragraphs: vec![
                    "Languages: Rust for anything that has to stay up, Go for services \
                     that have to ship this week, TypeScript at the edges, enough SQL to \
                     be dangerous."
                        .to_string(),
                    "Runtime and infra: tokio, async I/O, gRPC and plain old TCP, \
                     Postgres, SQLite, containers when they earn their keep."
                        .to_string(),
                    "Practices: property-based testing, tracing-first debugging, \
                     benchmarks before opinions, documentation written for the person \
                     on call at 3am."
                        .to_string(),
                ],
            },
        },
        SectionContent {
            id: "experience".to_string(),
            label: "Experience".to_string(),
            body: SectionBody::Text {
                paragraphs: vec![
                    "Senior engineer at a logistics startup, 2022 to now. I own the \
                     routing gateway: a Rust service that fans out to a dozen carrier \
                     APIs and answers in under fifty milliseconds or explains why not."
                        .to_string(),
                    "Before that, three years on a platform team building internal CLIs \
                     and the template repo everyone forked. The best code review I ever \
                     got was a single comment: \"what happens when this is empty?\""
                        .to_string(),
                    "Earlier still, embedded work on irrigation hardware. Watchdog \
                     timers, brownout recovery, and the discovery that the field is \
                     always muddier than the simulator."
                        .to_string(),
                ],
            },
        },
        SectionContent {
            id: "projects".to_string(),
            label: "Projects".to_string(),
            body: SectionBody::Projects {
                chips: vec![
                    "all".to_string(),
                    "rust".to_string(),
                    "tokio".to_string(),
                    "network".to_string(),
                    "tooling".to_string(),
                ],
                projects: vec![
                    Project {
                        title: "Flux Reader".to_string(),
                        tech: "rust, tokio, ratatui".to_string(),
                        blurb: "Terminal feed reader with offline cache and a renderer \
                                that stays under a millisecond per frame."
                            .to_string(),
                        link: Some("https://github.com/chartman/flux-reader".to_string()),
                    },
                    Project {
                        title: "Harbor Proxy".to_string(),
                        tech: "rust, tokio, network".to_string(),
                        blurb: "Connection-pooling reverse proxy with hot config reload \
                                and per-route latency budgets."
                            .to_string(),
                        link: Some("https://github.com/chartman/harbor".to_string()),
                    },
                    Project {
                        title: "Beacon CLI".to_string(),
                        tech: "rust, tooling".to_string(),
                        blurb: "One binary that answers \"is it us or them\": DNS, TLS, \
                                and HTTP checks with a shareable report."
                            .to_string(),
                        link: Some("https://github.com/chartman/beacon".to_string()),
                    },
                    Project {
                        title: "Quartz Notes".to_string(),
                        tech: "typescript, react".to_string(),
                        blurb: "Local-first notes app, full-text search in the browser, \
                                no account and no server."
                            .to_string(),
                        link: Some("https://github.com/chartman/quartz-notes".to_string()),
                    },
                    Project {
                        title: "Inkwell".to_string(),
                        tech: "go, tooling".to_string(),
                        blurb: "Static site generator for people who think front matter \
                                is already too much configuration."
                            .to_string(),
                        link: Some("https://github.com/chartman/inkwell".to_string()),
                    },
                    Project {
                        title: "Drift Metrics".to_string(),
                        tech: "rust, network".to_string(),
                        blurb: "Clock-drift monitor for small fleets; NTP without the \
                                folklore, graphs without the vendor."
                            .to_string(),
                        link: None,
                    },
                ],
            },
        },
        SectionContent {
            id: "contact".to_string(),
            label: "Contact".to_string(),
            body: SectionBody::Contact {
                intro: "Have a project in mind, a role to fill, or just want to talk \
                        shop? Send a note and I'll get back to you."
                    .to_string(),
            },
        },
    ]
}
