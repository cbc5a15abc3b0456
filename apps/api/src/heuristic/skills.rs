//! JD signal table: which keywords a job description asks for.

/// One row of the JD signal table: if any trigger occurs in the lowercased JD,
/// the listed keywords join the must-have (`wanted`) or nice-to-have set.
#[derive(Debug)]
pub struct SignalRule {
    pub triggers: &'static [&'static str],
    pub wanted: &'static [&'static str],
    pub nice: &'static [&'static str],
}

/// Evaluated top to bottom; row order fixes keyword order in each set.
pub const SIGNAL_RULES: &[SignalRule] = &[
    SignalRule {
        triggers: &["sql"],
        wanted: &["sql"],
        nice: &[],
    },
    SignalRule {
        triggers: &["rest", "api"],
        wanted: &["api", "rest"],
        nice: &[],
    },
    SignalRule {
        triggers: &["linux"],
        wanted: &["linux"],
        nice: &[],
    },
    SignalRule {
        triggers: &["aws"],
        wanted: &[],
        nice: &["aws"],
    },
    SignalRule {
        triggers: &["grafana", "opensearch"],
        wanted: &[],
        nice: &["grafana", "opensearch"],
    },
    SignalRule {
        triggers: &["python", "bash"],
        wanted: &[],
        nice: &["python", "bash"],
    },
    SignalRule {
        triggers: &["kubernetes"],
        wanted: &[],
        nice: &["kubernetes"],
    },
    SignalRule {
        triggers: &["support"],
        wanted: &["support"],
        nice: &[],
    },
];

/// Keywords derived from a JD. Each keyword appears at most once per set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    pub wanted: Vec<&'static str>,
    pub nice: Vec<&'static str>,
}

impl SkillSet {
    pub fn from_job_description(jd: &str) -> Self {
        let jd_lower = jd.to_lowercase();
        let mut skills = SkillSet::default();

        for rule in SIGNAL_RULES {
            if !rule.triggers.iter().any(|t| jd_lower.contains(t)) {
                continue;
            }
            push_unique(&mut skills.wanted, rule.wanted);
            push_unique(&mut skills.nice, rule.nice);
        }

        skills
    }
}

fn push_unique(set: &mut Vec<&'static str>, keywords: &[&'static str]) {
    for keyword in keywords {
        if !set.contains(keyword) {
            set.push(keyword);
        }
    }
}
