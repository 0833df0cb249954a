//! Resume analysis: career alignment, keyword coverage, contact and
//! section checks, and a weighted overall score.

use aho_corasick::AhoCorasick;
use log::info;
use regex::Regex;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::{CareerCompassError, Result};
use crate::processing::similarity::{CorpusModel, RankedCareer};

#[derive(Debug, Clone, Serialize)]
pub struct KeywordCoverage {
    /// Highest-weighted vocabulary terms for the target career.
    pub career_terms: Vec<String>,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// Matched terms as a fraction of all career terms, 0.0 when the career
    /// has no terms.
    pub coverage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactInfo {
    pub fn any_present(&self) -> bool {
        !self.emails.is_empty() || !self.phones.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionCheck {
    pub name: String,
    pub present: bool,
}

/// Everything the analyzer learned about one resume.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub target_career: String,
    /// True when the target was picked from the top match instead of being
    /// requested explicitly.
    pub auto_detected: bool,
    pub top_matches: Vec<RankedCareer>,
    pub keywords: KeywordCoverage,
    pub contact: ContactInfo,
    pub sections: Vec<SectionCheck>,
    pub quantifiable_numbers: bool,
    pub word_count: usize,
    /// Weighted alignment score as a percentage with one decimal.
    pub overall_score_pct: f64,
}

/// Runs the resume checks against a fitted corpus model.
pub struct ResumeAnalyzer {
    config: AnalysisConfig,
    email_regex: Regex,
    phone_regex: Regex,
    number_regex: Regex,
    word_regex: Regex,
    section_regexes: Vec<(String, Regex)>,
}

impl ResumeAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let email_regex = compile(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")?;
        let phone_regex = compile(r"(\+?\d[\d\-\s]{7,}\d)")?;
        let number_regex = compile(r"\b\d{1,4}\b")?;
        let word_regex = compile(r"\w+")?;

        let mut section_regexes = Vec::new();
        for section in &config.sections {
            let pattern = format!(r"\b{}\b", regex::escape(section));
            section_regexes.push((section.clone(), compile(&pattern)?));
        }

        Ok(Self {
            config,
            email_regex,
            phone_regex,
            number_regex,
            word_regex,
            section_regexes,
        })
    }

    /// Analyzes resume text. With no explicit target the best-matching
    /// career is used for the tailored keyword checks.
    pub fn analyze(
        &self,
        resume_text: &str,
        model: &CorpusModel,
        target: Option<&str>,
    ) -> Result<ResumeAnalysis> {
        if resume_text.trim().is_empty() {
            return Err(CareerCompassError::EmptyInput(
                "Resume text is empty or could not be extracted".to_string(),
            ));
        }

        let top_matches = model.rank(resume_text, self.config.top_matches)?;
        let best = top_matches.first().ok_or_else(|| {
            CareerCompassError::Processing("Corpus model has no careers to match against".to_string())
        })?;

        let (target_career, auto_detected) = match target {
            Some(name) => {
                if model.index_of(name).is_none() {
                    return Err(CareerCompassError::UnknownCareer(name.to_string()));
                }
                (name.to_string(), false)
            }
            None => (best.name.clone(), true),
        };

        let keywords = self.keyword_coverage(resume_text, model, &target_career)?;
        let contact = ContactInfo {
            emails: self.find_all(&self.email_regex, resume_text),
            phones: self.find_all(&self.phone_regex, resume_text),
        };

        let resume_lower = resume_text.to_lowercase();
        let sections: Vec<SectionCheck> = self
            .section_regexes
            .iter()
            .map(|(name, regex)| SectionCheck {
                name: name.clone(),
                present: regex.is_match(&resume_lower),
            })
            .collect();

        let quantifiable_numbers = self
            .number_regex
            .find_iter(resume_text)
            .any(|m| m.as_str().parse::<u32>().map(|n| n >= 1).unwrap_or(false));
        let word_count = self.word_regex.find_iter(resume_text).count();

        let sections_score = if sections.is_empty() {
            0.0
        } else {
            sections.iter().filter(|s| s.present).count() as f64 / sections.len() as f64
        };
        let contact_score = if contact.any_present() { 1.0 } else { 0.0 };
        let overall = self.config.similarity_weight * best.score
            + self.config.keyword_weight * keywords.coverage
            + self.config.sections_weight * sections_score
            + self.config.contact_weight * contact_score;
        let overall_score_pct = (overall * 1000.0).round() / 10.0;

        info!(
            "Resume analyzed: target '{}', {} words, alignment {:.1}%",
            target_career, word_count, overall_score_pct
        );

        Ok(ResumeAnalysis {
            target_career,
            auto_detected,
            top_matches,
            keywords,
            contact,
            sections,
            quantifiable_numbers,
            word_count,
            overall_score_pct,
        })
    }

    /// Top career vocabulary terms and which of them appear in the resume.
    /// Terms are the career row's highest-weighted features: the top pool is
    /// taken first, zero-weight terms dropped, then capped.
    fn keyword_coverage(
        &self,
        resume_text: &str,
        model: &CorpusModel,
        career: &str,
    ) -> Result<KeywordCoverage> {
        let career_terms = match model.index_of(career).and_then(|i| model.vector(i)) {
            Some(row) => {
                let names = model.vectorizer().feature_names();
                let mut weighted: Vec<(usize, f64)> = row
                    .iter()
                    .cloned()
                    .enumerate()
                    .collect();
                weighted.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
                });
                weighted
                    .into_iter()
                    .take(self.config.career_term_pool)
                    .filter(|(_, weight)| *weight > 0.0)
                    .take(self.config.career_term_cap)
                    .map(|(i, _)| names[i].to_string())
                    .collect()
            }
            None => Vec::new(),
        };

        // Overlapping scan so a term counts even when it only occurs inside
        // a longer term's match.
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&career_terms)
            .map_err(|e| {
                CareerCompassError::Processing(format!("Failed to build keyword matcher: {}", e))
            })?;
        let mut seen = vec![false; career_terms.len()];
        for hit in matcher.find_overlapping_iter(resume_text) {
            seen[hit.pattern().as_usize()] = true;
        }
        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for (term, present) in career_terms.iter().zip(&seen) {
            if *present {
                matched.push(term.clone());
            } else {
                missing.push(term.clone());
            }
        }

        let coverage = if career_terms.is_empty() {
            0.0
        } else {
            matched.len() as f64 / career_terms.len() as f64
        };

        Ok(KeywordCoverage {
            career_terms,
            matched,
            missing,
            coverage,
        })
    }

    fn find_all(&self, regex: &Regex, text: &str) -> Vec<String> {
        regex.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| CareerCompassError::Processing(format!("Invalid analyzer pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CareerRecord, CareerTable};
    use crate::config::Config;

    fn model() -> CorpusModel {
        let table = CareerTable::new(vec![
            CareerRecord {
                name: "Chef".to_string(),
                description: "Cooks meals and plans restaurant menus".to_string(),
                next_steps: vec!["Learn culinary techniques".to_string()],
                courses: vec![],
            },
            CareerRecord {
                name: "Software Engineer".to_string(),
                description: "Writes code and builds software systems".to_string(),
                next_steps: vec!["Practice algorithms".to_string()],
                courses: vec![],
            },
        ])
        .unwrap();
        CorpusModel::build(&table, &Config::default().engine).unwrap()
    }

    fn analyzer() -> ResumeAnalyzer {
        ResumeAnalyzer::new(Config::default().analysis).unwrap()
    }

    #[test]
    fn test_empty_resume_is_rejected() {
        let err = analyzer().analyze("   \n", &model(), None).unwrap_err();
        assert!(matches!(err, CareerCompassError::EmptyInput(_)));
    }

    #[test]
    fn test_auto_detected_target_is_best_match() {
        let analysis = analyzer()
            .analyze("I spent years cooking meals in restaurant kitchens", &model(), None)
            .unwrap();
        assert_eq!(analysis.target_career, "Chef");
        assert!(analysis.auto_detected);
        assert_eq!(analysis.top_matches.len(), 2);
        assert!(!analysis.keywords.career_terms.is_empty());
    }

    #[test]
    fn test_explicit_target_overrides_best_match() {
        let analysis = analyzer()
            .analyze(
                "I spent years cooking meals in restaurant kitchens",
                &model(),
                Some("Software Engineer"),
            )
            .unwrap();
        assert_eq!(analysis.target_career, "Software Engineer");
        assert!(!analysis.auto_detected);
        assert!(analysis
            .keywords
            .career_terms
            .iter()
            .any(|t| t == "software"));
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let err = analyzer()
            .analyze("some resume text", &model(), Some("Wizard"))
            .unwrap_err();
        assert!(matches!(err, CareerCompassError::UnknownCareer(_)));
    }

    #[test]
    fn test_contact_sections_and_numbers() {
        let resume = "Experience\n5 years in kitchens.\nEducation\nCulinary school.\n\
                      Reach me at jane.doe@example.com or +1 555-123-4567";
        let analysis = analyzer().analyze(resume, &model(), None).unwrap();

        assert_eq!(analysis.contact.emails, vec!["jane.doe@example.com"]);
        assert!(!analysis.contact.phones.is_empty());
        assert!(analysis.quantifiable_numbers);

        let present: Vec<&str> = analysis
            .sections
            .iter()
            .filter(|s| s.present)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(present, vec!["experience", "education"]);
        assert!(analysis.word_count > 10);
    }

    #[test]
    fn test_full_alignment_scores_one_hundred() {
        let table_text = "Cooks meals and plans restaurant menus Learn culinary techniques";
        let resume = format!(
            "{} experience education skills projects contact a@b.com",
            table_text
        );
        let analysis = analyzer().analyze(&resume, &model(), None).unwrap();

        assert_eq!(analysis.target_career, "Chef");
        assert!((analysis.keywords.coverage - 1.0).abs() < 1e-12);
        assert!(analysis.sections.iter().all(|s| s.present));
        assert!(analysis.contact.any_present());
        assert_eq!(analysis.overall_score_pct, 100.0);
    }

    #[test]
    fn test_missing_keywords_reported() {
        let analysis = analyzer()
            .analyze("I once visited a restaurant", &model(), Some("Chef"))
            .unwrap();
        assert!(analysis.keywords.matched.iter().any(|t| t == "restaurant"));
        assert!(analysis.keywords.missing.iter().any(|t| t == "culinary"));
        assert!(analysis.keywords.coverage < 1.0);
    }
}
