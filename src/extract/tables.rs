//! Reference tables consulted by the extractors
//!
//! Per-country facts (language, currency, climate, safety, work and visa
//! rules, salary ranges) and the international scholarship catalogue. The
//! tables are plain data handed to the extractors at construction time, so
//! tests can substitute their own.

use std::collections::HashMap;

/// Localized path guesses for university sites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLocale {
    Spanish,
    German,
    Dutch,
    LatinAmerican,
}

/// Safety tier by city
#[derive(Debug, Clone)]
pub struct SafetyTable {
    /// Rating for cities not listed below
    pub default: &'static str,

    /// Cities rated "Very Safe"
    pub safer_cities: &'static [&'static str],

    /// Cities rated "Average"
    pub average_cities: &'static [&'static str],
}

impl SafetyTable {
    pub fn rating_for(&self, city: &str) -> &'static str {
        if self.safer_cities.iter().any(|c| c.eq_ignore_ascii_case(city)) {
            "Very Safe"
        } else if self.average_cities.iter().any(|c| c.eq_ignore_ascii_case(city)) {
            "Average"
        } else {
            self.default
        }
    }
}

/// Everything the extractors know about a country up front
#[derive(Debug, Clone)]
pub struct CountryProfile {
    pub main_language: &'static str,
    pub currency: &'static str,
    pub locale: Option<PathLocale>,
    pub climate: &'static str,
    pub city_climates: &'static [(&'static str, &'static str)],
    pub safety: SafetyTable,
    pub part_time_work: &'static str,
    pub visa_cost: &'static str,
    pub visa_process: &'static str,
    pub visa_extension: &'static str,
    /// Pattern naming the post-study work route on career pages
    pub visa_extension_pattern: Option<&'static str>,
    pub starting_salary: &'static str,
}

impl CountryProfile {
    /// Climate for a city, falling back to the country-wide description
    pub fn climate_for(&self, city: &str) -> &'static str {
        self.city_climates
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city))
            .map(|(_, climate)| *climate)
            .unwrap_or(self.climate)
    }
}

/// A scholarship programme offered across universities
#[derive(Debug, Clone)]
pub struct InternationalScholarship {
    pub name: &'static str,
    pub funding_type: &'static str,
    pub url: &'static str,
    pub eligibility: &'static str,
    pub countries: &'static [&'static str],
}

impl InternationalScholarship {
    pub fn applies_to(&self, country: &str) -> bool {
        self.countries.contains(&country)
    }
}

/// All reference data used during extraction
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    countries: HashMap<&'static str, CountryProfile>,
    pub international_scholarships: Vec<InternationalScholarship>,
    pub known_employers: &'static [&'static str],
    pub student_services: &'static str,
    pub default_salary: &'static str,
}

impl ReferenceTables {
    /// Profile for a country by its configured name
    pub fn country(&self, name: &str) -> Option<&CountryProfile> {
        self.countries.get(name)
    }

    /// Replaces or adds a country profile
    pub fn with_country(mut self, name: &'static str, profile: CountryProfile) -> Self {
        self.countries.insert(name, profile);
        self
    }

    /// Scholarships applicable to universities in `country`
    pub fn scholarships_for<'a>(
        &'a self,
        country: &'a str,
    ) -> impl Iterator<Item = &'a InternationalScholarship> + 'a {
        self.international_scholarships
            .iter()
            .filter(move |s| s.applies_to(country))
    }

    /// The built-in tables for the supported countries
    pub fn builtin() -> Self {
        let countries = HashMap::from([
            (
                "Estados Unidos",
                CountryProfile {
                    main_language: "English",
                    currency: "USD",
                    locale: None,
                    climate: "Varies by region: continental to subtropical",
                    city_climates: &[
                        ("Boston", "Continental: cold winters and warm summers"),
                        ("San Francisco", "Mediterranean: mild all year"),
                        ("New York", "Continental: cold winters and hot summers"),
                        ("Chicago", "Continental: very cold winters and warm summers"),
                        ("Los Angeles", "Mediterranean: mild and dry"),
                    ],
                    safety: SafetyTable {
                        default: "Average",
                        safer_cities: &["Boston", "San Francisco"],
                        average_cities: &["Chicago", "Los Angeles"],
                    },
                    part_time_work: "Up to 20 hours/week on an F-1 visa (on-campus only)",
                    visa_cost: "$350 (F-1)",
                    visa_process: "Requires the university's I-20 and a consular interview",
                    visa_extension: "OPT: 12 months + 24 more for STEM",
                    visa_extension_pattern: Some(r"(?i)\b(OPT|Optional Practical Training|STEM extension)\b"),
                    starting_salary: "$75,000-120,000",
                },
            ),
            (
                "Reino Unido",
                CountryProfile {
                    main_language: "English",
                    currency: "GBP",
                    locale: None,
                    climate: "Oceanic: mild and humid",
                    city_climates: &[
                        ("London", "Oceanic: mild and humid all year"),
                        ("Cambridge", "Oceanic: mild and humid all year"),
                        ("Oxford", "Oceanic: mild and humid all year"),
                        ("Edinburgh", "Oceanic: cool and humid all year"),
                    ],
                    safety: SafetyTable {
                        default: "Safe",
                        safer_cities: &["Cambridge", "Oxford"],
                        average_cities: &["London"],
                    },
                    part_time_work: "Up to 20 hours/week during term time",
                    visa_cost: "£348 (Student visa)",
                    visa_process: "Requires a CAS from the university",
                    visa_extension: "Graduate Route: 2 years (3 for doctorates)",
                    visa_extension_pattern: Some(r"(?i)(Graduate Route|Post-Study Work Visa)"),
                    starting_salary: "£35,000-60,000",
                },
            ),
            (
                "Canadá",
                CountryProfile {
                    main_language: "English/French",
                    currency: "CAD",
                    locale: None,
                    climate: "Continental: very cold winters",
                    city_climates: &[
                        ("Toronto", "Continental: very cold winters and warm summers"),
                        ("Vancouver", "Oceanic: mild and very rainy"),
                        ("Montreal", "Continental: extremely cold winters"),
                        ("Ottawa", "Continental: extremely cold winters"),
                    ],
                    safety: SafetyTable {
                        default: "Very Safe",
                        safer_cities: &["Vancouver", "Ottawa"],
                        average_cities: &[],
                    },
                    part_time_work: "Up to 20 hours/week off campus",
                    visa_cost: "CAD $150",
                    visa_process: "Requires an acceptance letter and proof of funds",
                    visa_extension: "PGWP: up to 3 years depending on program length",
                    visa_extension_pattern: Some(r"(?i)(PGWP|Post-Graduation Work Permit)"),
                    starting_salary: "CAD $70,000-95,000",
                },
            ),
            (
                "España",
                CountryProfile {
                    main_language: "Spanish",
                    currency: "EUR",
                    locale: Some(PathLocale::Spanish),
                    climate: "Mediterranean: warm summers and mild winters",
                    city_climates: &[
                        ("Madrid", "Continental Mediterranean: hot summers and cold winters"),
                        ("Barcelona", "Mediterranean: warm summers and mild winters"),
                        ("Valencia", "Mediterranean: hot summers and mild winters"),
                        ("Sevilla", "Mediterranean: very hot summers and mild winters"),
                    ],
                    safety: SafetyTable {
                        default: "Safe",
                        safer_cities: &["Salamanca"],
                        average_cities: &["Madrid", "Barcelona"],
                    },
                    part_time_work: "Allowed with a student permit (initial modification)",
                    visa_cost: "€80",
                    visa_process: "Requires health insurance and proof of funds",
                    visa_extension: "Job-search stay extension: 12 months",
                    visa_extension_pattern: Some(r"(?i)(post-study work visa|b[uú]squeda de empleo)"),
                    starting_salary: "€30,000-45,000",
                },
            ),
            (
                "Alemania",
                CountryProfile {
                    main_language: "German",
                    currency: "EUR",
                    locale: Some(PathLocale::German),
                    climate: "Continental: cold winters and mild summers",
                    city_climates: &[
                        ("Munich", "Continental: cold winters and mild summers"),
                        ("Berlin", "Continental: cold winters and mild summers"),
                        ("Heidelberg", "Continental: cold winters and mild summers"),
                        ("Aachen", "Oceanic: mild and humid"),
                    ],
                    safety: SafetyTable {
                        default: "Very Safe",
                        safer_cities: &["Munich", "Heidelberg"],
                        average_cities: &["Berlin"],
                    },
                    part_time_work: "Up to 120 full days or 240 half days per year",
                    visa_cost: "€75",
                    visa_process: "Requires an acceptance letter and a blocked account",
                    visa_extension: "Job-seeker residence permit: 18 months",
                    visa_extension_pattern: Some(r"(?i)(18-month residence permit|job-seeker visa)"),
                    starting_salary: "€45,000-65,000",
                },
            ),
            (
                "Suiza",
                CountryProfile {
                    main_language: "German/French/Italian",
                    currency: "CHF",
                    locale: Some(PathLocale::German),
                    climate: "Alpine continental: cold winters",
                    city_climates: &[
                        ("Zurich", "Continental: cold winters and mild summers"),
                        ("Lausanne", "Moderate continental: influenced by Lake Geneva"),
                        ("Geneva", "Moderate continental: influenced by Lake Geneva"),
                        ("Lugano", "Mountain Mediterranean: warmer than the rest of Switzerland"),
                    ],
                    safety: SafetyTable {
                        default: "Very Safe",
                        safer_cities: &["Zurich", "Geneva", "Lausanne"],
                        average_cities: &[],
                    },
                    part_time_work: "Up to 15 hours/week (restrictions vary by canton)",
                    visa_cost: "CHF 60-140",
                    visa_process: "Varies by canton and nationality",
                    visa_extension: "Job-search permit: 6 months",
                    visa_extension_pattern: Some(r"(?i)(six months to find work)"),
                    starting_salary: "CHF 80,000-120,000",
                },
            ),
            (
                "Países Bajos",
                CountryProfile {
                    main_language: "Dutch/English",
                    currency: "EUR",
                    locale: Some(PathLocale::Dutch),
                    climate: "Oceanic: mild and humid",
                    city_climates: &[
                        ("Amsterdam", "Oceanic: mild and humid all year"),
                        ("Delft", "Oceanic: mild and humid all year"),
                        ("Utrecht", "Oceanic: mild and humid all year"),
                        ("Leiden", "Oceanic: mild and humid all year"),
                    ],
                    safety: SafetyTable {
                        default: "Safe",
                        safer_cities: &["Delft", "Leiden"],
                        average_cities: &["Amsterdam"],
                    },
                    part_time_work: "Up to 16 hours/week or full time in summer",
                    visa_cost: "€207",
                    visa_process: "Handled by the university (MVV)",
                    visa_extension: "Orientation Year: 12 months",
                    visa_extension_pattern: Some(r"(?i)(orientation year|zoekjaar)"),
                    starting_salary: "€40,000-65,000",
                },
            ),
            (
                "México",
                CountryProfile {
                    main_language: "Spanish",
                    currency: "MXN",
                    locale: Some(PathLocale::LatinAmerican),
                    climate: "Varies by region: tropical to desert",
                    city_climates: &[],
                    safety: SafetyTable {
                        default: "Below Average",
                        safer_cities: &["Querétaro", "Mérida"],
                        average_cities: &["Ciudad de México"],
                    },
                    part_time_work: "Restricted on a student visa",
                    visa_cost: "$36",
                    visa_process: "Requires an acceptance letter and proof of funds",
                    visa_extension: "May switch to a work visa with a job offer",
                    visa_extension_pattern: None,
                    starting_salary: "MXN 240,000-600,000",
                },
            ),
            (
                "Chile",
                CountryProfile {
                    main_language: "Spanish",
                    currency: "CLP",
                    locale: Some(PathLocale::LatinAmerican),
                    climate: "Varies by region: Mediterranean to subpolar",
                    city_climates: &[],
                    safety: SafetyTable {
                        default: "Safe",
                        safer_cities: &["Viña del Mar"],
                        average_cities: &["Santiago"],
                    },
                    part_time_work: "Allowed on a student visa",
                    visa_cost: "$100",
                    visa_process: "Requires an acceptance letter and a background check",
                    visa_extension: "Visa subject to a contract with a job offer",
                    visa_extension_pattern: None,
                    starting_salary: "CLP 15,000,000-30,000,000",
                },
            ),
        ]);

        Self {
            countries,
            international_scholarships: builtin_scholarships(),
            known_employers: KNOWN_EMPLOYERS,
            student_services: "Orientation, health services, academic advising, counseling, sports facilities, libraries, career services",
            default_salary: "$60,000-90,000",
        }
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

const KNOWN_EMPLOYERS: &[&str] = &[
    "Google", "Microsoft", "Amazon", "Apple", "Facebook", "IBM", "Oracle", "Intel", "Cisco",
    "Adobe", "SAP", "Accenture", "Deloitte", "PwC", "KPMG", "EY", "McKinsey",
    "Boston Consulting", "Bain", "Goldman Sachs", "JP Morgan", "Morgan Stanley",
    "Bank of America", "Citigroup", "HSBC", "Barclays",
];

const EUROPE: &[&str] = &["España", "Reino Unido", "Alemania", "Suiza", "Países Bajos"];

fn builtin_scholarships() -> Vec<InternationalScholarship> {
    vec![
        InternationalScholarship {
            name: "Fulbright Foreign Student Program",
            funding_type: "Full Tuition",
            url: "https://foreign.fulbrightonline.org/",
            eligibility: "International students applying to US universities",
            countries: &["Estados Unidos"],
        },
        InternationalScholarship {
            name: "Chevening Scholarships",
            funding_type: "Full Tuition",
            url: "https://www.chevening.org/",
            eligibility: "International students applying to UK universities",
            countries: &["Reino Unido"],
        },
        InternationalScholarship {
            name: "Gates Cambridge Scholarship",
            funding_type: "Full Tuition",
            url: "https://www.gatescambridge.org/",
            eligibility: "International students applying to University of Cambridge",
            countries: &["Reino Unido"],
        },
        InternationalScholarship {
            name: "DAAD Scholarships",
            funding_type: "Full Tuition",
            url: "https://www.daad.de/en/",
            eligibility: "International students applying to German universities",
            countries: &["Alemania"],
        },
        InternationalScholarship {
            name: "Swiss Government Excellence Scholarships",
            funding_type: "Full Tuition",
            url: "https://www.sbfi.admin.ch/sbfi/en/home/education/scholarships-and-grants/swiss-government-excellence-scholarships.html",
            eligibility: "International students applying to Swiss universities",
            countries: &["Suiza"],
        },
        InternationalScholarship {
            name: "Erasmus Mundus Joint Master Degrees",
            funding_type: "Full Tuition",
            url: "https://erasmus-plus.ec.europa.eu/opportunities/individuals/students/erasmus-mundus-joint-masters-scholarships",
            eligibility: "International students applying to European universities",
            countries: EUROPE,
        },
        InternationalScholarship {
            name: "Colfuturo",
            funding_type: "Partial Tuition",
            url: "https://www.colfuturo.org/",
            eligibility: "Colombian students for international postgraduate studies",
            countries: &[
                "Estados Unidos", "España", "Reino Unido", "Canadá", "Alemania", "Suiza",
                "Países Bajos", "Chile",
            ],
        },
        InternationalScholarship {
            name: "CONACYT Scholarships",
            funding_type: "Full Tuition",
            url: "https://www.conacyt.mx/",
            eligibility: "Mexican students for graduate studies",
            countries: &[
                "México", "Estados Unidos", "España", "Reino Unido", "Canadá", "Alemania", "Suiza",
            ],
        },
        InternationalScholarship {
            name: "ANID Becas Chile",
            funding_type: "Full Tuition",
            url: "https://www.anid.cl/capital-humano/becas-chile/",
            eligibility: "Chilean students for graduate studies abroad",
            countries: &[
                "Chile", "Estados Unidos", "España", "Reino Unido", "Canadá", "Alemania", "Suiza",
            ],
        },
        InternationalScholarship {
            name: "Holland Scholarship",
            funding_type: "Partial Tuition",
            url: "https://www.studyinholland.nl/finances/holland-scholarship",
            eligibility: "International students from outside the European Economic Area",
            countries: &["Países Bajos"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_supported_countries_present() {
        let tables = ReferenceTables::builtin();
        for name in [
            "Estados Unidos", "España", "Reino Unido", "Canadá", "Alemania", "Suiza",
            "Países Bajos", "México", "Chile",
        ] {
            assert!(tables.country(name).is_some(), "missing {}", name);
        }
        assert!(tables.country("Atlantis").is_none());
    }

    #[test]
    fn test_madrid_is_average() {
        let tables = ReferenceTables::builtin();
        let spain = tables.country("España").unwrap();
        assert_eq!(spain.safety.rating_for("Madrid"), "Average");
        assert_eq!(spain.safety.rating_for("Salamanca"), "Very Safe");
        assert_eq!(spain.safety.rating_for("Granada"), "Safe");
    }

    #[test]
    fn test_climate_falls_back_to_country() {
        let tables = ReferenceTables::builtin();
        let germany = tables.country("Alemania").unwrap();
        assert_eq!(germany.climate_for("Aachen"), "Oceanic: mild and humid");
        assert_eq!(germany.climate_for("Dresden"), germany.climate);
    }

    #[test]
    fn test_spain_scholarships_include_erasmus() {
        let tables = ReferenceTables::builtin();
        let names: Vec<_> = tables.scholarships_for("España").map(|s| s.name).collect();
        assert!(names.contains(&"Erasmus Mundus Joint Master Degrees"));
        assert!(!names.contains(&"Fulbright Foreign Student Program"));
    }

    #[test]
    fn test_visa_patterns_compile() {
        let tables = ReferenceTables::builtin();
        for profile in tables.countries.values() {
            if let Some(pattern) = profile.visa_extension_pattern {
                assert!(regex::Regex::new(pattern).is_ok(), "{}", pattern);
            }
        }
    }
}
