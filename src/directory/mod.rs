//! Alumni directory filtering.
//!
//! The directory endpoint fetches every complete alumni profile and narrows
//! the list in memory. Filters combine with logical AND, an inactive filter
//! matches everything, and the fetch order is preserved.

use serde::Deserialize;
use std::collections::BTreeSet;

use crate::db::AlumniWithProfile;

/// Select-box value meaning "no filter"
const ALL: &str = "all";

/// Raw query string of `GET /api/directory`
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    pub search: Option<String>,
    pub graduation_year: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Lowercased free-text search over name, company, role and industry
    pub search: Option<String>,
    pub graduation_year: Option<i64>,
    pub company: Option<String>,
    pub industry: Option<String>,
}

fn selected(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != ALL)
}

impl DirectoryFilter {
    /// Build a filter from query parameters. Empty values and `all` are inactive.
    pub fn from_query(query: DirectoryQuery) -> Result<Self, String> {
        let graduation_year = match selected(query.graduation_year) {
            Some(year) => Some(
                year.trim()
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid graduation year: {}", year))?,
            ),
            None => None,
        };

        let search = query
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(Self {
            search,
            graduation_year,
            company: selected(query.company),
            industry: selected(query.industry),
        })
    }

    pub fn is_active(&self) -> bool {
        self.search.is_some()
            || self.graduation_year.is_some()
            || self.company.is_some()
            || self.industry.is_some()
    }

    pub fn matches(&self, entry: &AlumniWithProfile) -> bool {
        let alumni = &entry.alumni;

        if let Some(query) = &self.search {
            let hit = [
                entry.full_name.as_str(),
                alumni.current_company.as_str(),
                alumni.job_role.as_str(),
                alumni.industry.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(query.as_str()));
            if !hit {
                return false;
            }
        }

        if let Some(year) = self.graduation_year {
            if alumni.graduation_year != Some(year) {
                return false;
            }
        }

        if let Some(company) = &self.company {
            if &alumni.current_company != company {
                return false;
            }
        }

        if let Some(industry) = &self.industry {
            if &alumni.industry != industry {
                return false;
            }
        }

        true
    }

    /// Keep the entries matching every active predicate, in their original order
    pub fn apply(&self, alumni: Vec<AlumniWithProfile>) -> Vec<AlumniWithProfile> {
        if !self.is_active() {
            return alumni;
        }
        alumni.into_iter().filter(|a| self.matches(a)).collect()
    }
}

/// Values offered by the directory's select boxes
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilterOptions {
    /// Newest year first
    pub years: Vec<i64>,
    pub companies: Vec<String>,
    pub industries: Vec<String>,
}

impl FilterOptions {
    pub fn from_alumni(alumni: &[AlumniWithProfile]) -> Self {
        let mut years = BTreeSet::new();
        let mut companies = BTreeSet::new();
        let mut industries = BTreeSet::new();

        for entry in alumni {
            if let Some(year) = entry.alumni.graduation_year {
                years.insert(year);
            }
            companies.insert(entry.alumni.current_company.clone());
            industries.insert(entry.alumni.industry.clone());
        }

        Self {
            years: years.into_iter().rev().collect(),
            companies: companies.into_iter().collect(),
            industries: industries.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::AlumniProfileRow;

    fn alumnus(name: &str, year: i64, company: &str, role: &str, industry: &str) -> AlumniWithProfile {
        AlumniWithProfile {
            alumni: AlumniProfileRow {
                id: format!("ap-{}", name),
                user_id: format!("u-{}", name),
                graduation_year: Some(year),
                current_company: company.to_string(),
                job_role: role.to_string(),
                industry: industry.to_string(),
                willing_to_mentor: false,
                linkedin_url: None,
                years_of_experience: None,
                location: None,
                bio: None,
                is_profile_complete: true,
                created_at: String::new(),
                updated_at: String::new(),
            },
            full_name: name.to_string(),
            email: format!("{}@example.edu", name.to_lowercase()),
            avatar_url: None,
        }
    }

    fn sample() -> Vec<AlumniWithProfile> {
        vec![
            alumnus("Asha", 2023, "Acme", "Backend Engineer", "Software"),
            alumnus("Bilal", 2019, "Globex", "Analyst", "Finance"),
            alumnus("Chen", 2023, "Initech", "Product Manager", "Software"),
            alumnus("Dana", 2015, "Acme", "Director", "Manufacturing"),
            alumnus("Eli", 2021, "Umbrella", "Researcher", "Healthcare"),
        ]
    }

    fn names(list: &[AlumniWithProfile]) -> Vec<&str> {
        list.iter().map(|a| a.full_name.as_str()).collect()
    }

    fn query(search: &str, year: &str, company: &str, industry: &str) -> DirectoryFilter {
        let opt = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
        DirectoryFilter::from_query(DirectoryQuery {
            search: opt(search),
            graduation_year: opt(year),
            company: opt(company),
            industry: opt(industry),
        })
        .unwrap()
    }

    #[test]
    fn test_no_filter_is_identity() {
        let filter = query("", "all", "all", "all");
        assert!(!filter.is_active());
        assert_eq!(filter.apply(sample()), sample());
    }

    #[test]
    fn test_graduation_year_scenario() {
        let result = query("", "2023", "", "").apply(sample());
        assert_eq!(result.len(), 2);
        assert_eq!(names(&result), vec!["Asha", "Chen"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        assert_eq!(names(&query("acme", "", "", "").apply(sample())), vec!["Asha", "Dana"]);
        assert_eq!(names(&query("ENGINEER", "", "", "").apply(sample())), vec!["Asha"]);
        assert_eq!(names(&query("health", "", "", "").apply(sample())), vec!["Eli"]);
        assert_eq!(names(&query("bil", "", "", "").apply(sample())), vec!["Bilal"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let result = query("", "2023", "Acme", "Software").apply(sample());
        assert_eq!(names(&result), vec!["Asha"]);

        let result = query("director", "2023", "", "").apply(sample());
        assert!(result.is_empty());
    }

    #[test]
    fn test_company_and_industry_are_exact() {
        assert!(query("", "", "acme", "").apply(sample()).is_empty());
        assert_eq!(names(&query("", "", "", "Software").apply(sample())), vec!["Asha", "Chen"]);
    }

    #[test]
    fn test_every_result_satisfies_every_predicate() {
        let searches = ["", "a", "software", "zzz"];
        let years = ["", "2023", "2015", "1999"];
        let companies = ["", "Acme", "Globex"];
        let industries = ["", "Software", "Finance"];

        for s in searches {
            for y in years {
                for c in companies {
                    for i in industries {
                        let filter = query(s, y, c, i);
                        let all = sample();
                        let result = filter.apply(all.clone());
                        assert!(result.len() <= all.len());
                        for entry in &result {
                            assert!(all.contains(entry));
                            assert!(filter.matches(entry));
                        }
                        let expected: Vec<_> = all.iter().filter(|a| filter.matches(a)).cloned().collect();
                        assert_eq!(result, expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_invalid_year_is_rejected() {
        let result = DirectoryFilter::from_query(DirectoryQuery {
            graduation_year: Some("twenty".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_whitespace_search_is_inactive() {
        assert!(!query("   ", "", "", "").is_active());
    }

    #[test]
    fn test_filter_options() {
        let options = FilterOptions::from_alumni(&sample());
        assert_eq!(options.years, vec![2023, 2021, 2019, 2015]);
        assert_eq!(options.companies, vec!["Acme", "Globex", "Initech", "Umbrella"]);
        assert_eq!(
            options.industries,
            vec!["Finance", "Healthcare", "Manufacturing", "Software"]
        );
    }
}
