use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::text::str_simplified;
use crate::types::RoleTitle;

/// Case-insensitive alternation of title patterns.
///
/// An empty set never matches. Patterns that are not valid regular expressions
/// are matched literally.
#[derive(Debug, Clone)]
pub struct PatternSet {
    regex: Option<Regex>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        if patterns.is_empty() {
            return Self { regex: None };
        }

        let joined = patterns
            .iter()
            .map(|p| format!("(?:{})", p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        let regex = match build_case_insensitive(&joined) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Invalid title pattern in '{}', matching literally: {}", joined, e);
                let literal = patterns
                    .iter()
                    .map(|p| regex::escape(p.as_ref()))
                    .collect::<Vec<_>>()
                    .join("|");
                build_case_insensitive(&literal).ok()
            }
        };

        Self { regex }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().map(|r| r.is_match(text)).unwrap_or(false)
    }
}

fn build_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[derive(Debug, Clone)]
enum TitleMatcher {
    Contains(&'static str),
    Patterns(PatternSet),
}

impl TitleMatcher {
    fn matches(&self, title: &str) -> bool {
        match self {
            TitleMatcher::Contains(needle) => title.contains(needle),
            TitleMatcher::Patterns(patterns) => patterns.is_match(title),
        }
    }
}

#[derive(Debug, Clone)]
struct TitleRule {
    matcher: TitleMatcher,
    title: RoleTitle,
}

/// Rules evaluated in order, first match wins
#[derive(Debug, Clone)]
struct RuleChain {
    rules: Vec<TitleRule>,
    fallback: RoleTitle,
    lowercase: bool,
}

impl RuleChain {
    fn classify(&self, title: Option<&str>) -> RoleTitle {
        let Some(title) = title else {
            return self.fallback;
        };

        let mut text = str_simplified(title);
        if self.lowercase {
            text = text.to_lowercase();
        }

        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&text))
            .map(|rule| rule.title)
            .unwrap_or(self.fallback)
    }
}

/// Maps free-text titles onto [`RoleTitle`].
///
/// Primary bodies only ever yield Councilmember or Council President; other
/// bodies never do.
#[derive(Debug, Clone)]
pub struct TitleClassifier {
    primary: RuleChain,
    committee: RuleChain,
}

impl TitleClassifier {
    pub fn new<S: AsRef<str>>(council_president_patterns: &[S], chair_patterns: &[S]) -> Self {
        let primary = RuleChain {
            rules: vec![TitleRule {
                matcher: TitleMatcher::Patterns(PatternSet::new(council_president_patterns)),
                title: RoleTitle::CouncilPresident,
            }],
            fallback: RoleTitle::Councilmember,
            lowercase: false,
        };

        let committee = RuleChain {
            rules: vec![
                TitleRule {
                    matcher: TitleMatcher::Contains("vice"),
                    title: RoleTitle::ViceChair,
                },
                TitleRule {
                    matcher: TitleMatcher::Contains("alt"),
                    title: RoleTitle::Alternate,
                },
                TitleRule {
                    matcher: TitleMatcher::Contains("super"),
                    title: RoleTitle::Supervisor,
                },
                TitleRule {
                    matcher: TitleMatcher::Patterns(PatternSet::new(chair_patterns)),
                    title: RoleTitle::Chair,
                },
            ],
            fallback: RoleTitle::Member,
            lowercase: true,
        };

        Self { primary, committee }
    }

    pub fn classify(&self, title: Option<&str>, on_primary_body: bool) -> RoleTitle {
        if on_primary_body {
            self.classify_primary(title)
        } else {
            self.classify_committee(title)
        }
    }

    pub fn classify_primary(&self, title: Option<&str>) -> RoleTitle {
        self.primary.classify(title)
    }

    pub fn classify_committee(&self, title: Option<&str>) -> RoleTitle {
        self.committee.classify(title)
    }
}
