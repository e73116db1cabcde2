use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const UNKNOWN_FORM: &str = "unknown-form";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Category {
    Wellness,
    Custom,
    Deity,
    Job,
    Money,
    Love,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Wellness,
        Category::Custom,
        Category::Deity,
        Category::Job,
        Category::Money,
        Category::Love,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Wellness => "wellness",
            Category::Custom => "custom",
            Category::Deity => "deity",
            Category::Job => "job",
            Category::Money => "money",
            Category::Love => "love",
        }
    }

    /// Human readable label, used in mail subjects and page headings.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Wellness => "Wellness Reading",
            Category::Custom => "Custom Reading",
            Category::Deity => "Deity Reading",
            Category::Job => "Job Reading",
            Category::Money => "Money Reading",
            Category::Love => "Love Reading",
        }
    }

    pub fn reading_path(&self) -> String {
        format!("/{}reading", self.slug())
    }

    pub fn payment_path(&self) -> String {
        format!("/{}payment", self.slug())
    }

    /// Label posted by the category's own order form.
    pub fn form_source(&self) -> String {
        format!("{}-payment", self.slug())
    }

    /// Page the visitor lands on once a submission has been dispatched.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Category::Wellness
            | Category::Custom
            | Category::Deity
            | Category::Job
            | Category::Money
            | Category::Love => "/personal",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Duration {
    ThirtyMinutes,
    SixtyMinutes,
}

impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Duration::ThirtyMinutes => write!(f, "30 minutes"),
            Duration::SixtyMinutes => write!(f, "60 minutes"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UnknownDuration;

impl FromStr for Duration {
    type Err = UnknownDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "30 minutes" => Ok(Duration::ThirtyMinutes),
            "60 minutes" => Ok(Duration::SixtyMinutes),
            &_ => Err(UnknownDuration),
        }
    }
}

/// Raw fields as posted by a reading form. Missing fields deserialize empty.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReadingForm {
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
    pub form_source: Option<String>,
}

/// A validated reading request, alive for a single request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Submission {
    pub duration: Duration,
    pub email: String,
    pub description: String,
    pub phone: String,
    pub form_source: String,
}

impl TryFrom<ReadingForm> for Submission {
    type Error = Vec<String>;

    fn try_from(form: ReadingForm) -> Result<Self, Self::Error> {
        let errors = crate::validation::validate(&form);
        if !errors.is_empty() {
            return Err(errors);
        }
        let duration = form.duration.parse().map_err(|_| {
            vec![crate::validation::INVALID_DURATION.to_string()]
        })?;
        let form_source = form
            .form_source
            .as_deref()
            .map(str::trim)
            .filter(|source| !source.is_empty())
            .unwrap_or(UNKNOWN_FORM)
            .to_string();
        Ok(Self {
            duration,
            email: form.email.trim().to_string(),
            description: form.description.trim().to_string(),
            phone: form.phone.trim().to_string(),
            form_source,
        })
    }
}
