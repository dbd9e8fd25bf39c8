// * PubMed mode-switch scenarios.
// * Paths carry `p$mobile=true` to force mobile detection; a case's cookie is
// * the mode preference already stored by the browser.

use crate::engine::verify::Expectation;
use crate::network::cookies::{CookiePreset, SiteMode};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RedirectCase {
    pub name: &'static str,
    pub path: &'static str,
    pub cookie: Option<SiteMode>,
    pub expect: Expectation,
}

impl RedirectCase {
    // * History test: expects a 303 to `location`
    pub fn see_other(
        name: &'static str,
        path: &'static str,
        location: &str,
        cookie: Option<SiteMode>,
    ) -> Self {
        Self {
            name,
            path,
            cookie,
            expect: Expectation::SeeOther {
                location: location.to_string(),
            },
        }
    }

    // * Routing rule test: expects 200 at `path` itself
    pub fn served(name: &'static str, path: &'static str, cookie: Option<SiteMode>) -> Self {
        Self {
            name,
            path,
            cookie,
            expect: Expectation::Served,
        }
    }

    pub fn direct(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            cookie: None,
            expect: Expectation::Direct,
        }
    }

    pub fn cookies(&self) -> Option<CookiePreset> {
        self.cookie.map(CookiePreset::for_mode)
    }
}

pub fn pubmed_cases() -> Vec<RedirectCase> {
    use SiteMode::{Mobile, Standard};

    vec![
        RedirectCase::direct("std_homepage_no_emulation", "/pubmed"),
        // No cookie: emulated mobile device lands on the mobile site
        RedirectCase::see_other("std_homepage_with_mobile_emulation", "/pubmed?p$mobile=true", "/m/pubmed/", None),
        RedirectCase::see_other("std_abstract_with_mobile_emulation", "/pubmed/17328369?p$mobile=true", "/m/pubmed/17328369/", None),
        RedirectCase::see_other("std_search_with_mobile_emulation", "/pubmed?term=breast+cancer&p$mobile=true", "/m/pubmed/?term=breast+cancer", None),
        RedirectCase::see_other("std_search_with_mobile_emulation_queryparams_reversed", "/pubmed?p$mobile=true&term=breast+cancer", "/m/pubmed/?term=breast+cancer", None),
        RedirectCase::see_other("two_word_search_with_mobile_emulation", "/pubmed?p$mobile=true&term=heart%20attack", "/m/pubmed/?term=heart+attack", None),
        RedirectCase::see_other("two_word_search_encoded_with_mobile_emulation", "/pubmed?p$mobile=true&term=brca1%20brca2", "/m/pubmed/?term=brca1+brca2", None),
        RedirectCase::see_other("three_word_search_with_mobile_emulation", "/pubmed?p$mobile=true&term=asprin%20heart%20attack", "/m/pubmed/?term=asprin+heart+attack", None),
        RedirectCase::see_other("three_word_search_encoded_with_mobile_emulation", "/pubmed?p$mobile=true&term=breast%20cancer%20brca1", "/m/pubmed/?term=breast+cancer+brca1", None),
        RedirectCase::see_other("std_link_with_mobile_emulation", "/pubmed?cmd=link&linkname=pubmed_pubmed&uid=18590863&p$mobile=true", "/m/pubmed/18590863/related/", None),
        // Mobile cookie: same targets
        RedirectCase::see_other("std_homepage_with_mobile_cookie", "/pubmed?p$mobile=true", "/m/pubmed/", Some(Mobile)),
        RedirectCase::see_other("std_abstract_with_mobile_cookie", "/pubmed/18066186?p$mobile=true", "/m/pubmed/18066186/", Some(Mobile)),
        RedirectCase::see_other("std_search_with_mobile_cookie", "/pubmed/?term=shostakovich&p$mobile=true", "/m/pubmed/?term=shostakovich", Some(Mobile)),
        RedirectCase::see_other("std_link_with_mobile_cookie", "/pubmed/?cmd=link&linkname=pubmed_pubmed&uid=123456&p$mobile=true", "/m/pubmed/123456/related/", Some(Mobile)),
        // Explicit standard flag overrides a mobile cookie
        RedirectCase::see_other("std_homepage_with_standard_flag", "/pubmed?p$mobile=true&ncbi_mmode=std", "/pubmed", Some(Mobile)),
        RedirectCase::see_other("std_search_with_std_flag", "/pubmed?term=whale&p$mobile=true&ncbi_mmode=std", "/pubmed?term=whale", Some(Mobile)),
        RedirectCase::see_other("std_abstract_with_std_flag", "/pubmed/18590863?ncbi_mmode=std&p$mobile=true", "/pubmed/18590863", Some(Mobile)),
        RedirectCase::see_other("std_link_with_std_flag", "/pubmed?cmd=link&ncbi_mmode=std&linkname=pubmed_pubmed&p$mobile=true&uid=17328369", "/pubmed?cmd=link&linkname=pubmed_pubmed&uid=17328369", Some(Mobile)),
        // Standard flag with a standard cookie: nothing to switch
        RedirectCase::served("std_homepage_with_standard_flag_and_cookie", "/pubmed?p$mobile=true&ncbi_mmode=std", Some(Standard)),
        RedirectCase::served("std_search_with_std_flag_and_cookie", "/pubmed?term=whale&p$mobile=true&ncbi_mmode=std", Some(Standard)),
        RedirectCase::served("std_abstract_with_std_flag_and_cookie", "/pubmed/18590863?ncbi_mmode=std&p$mobile=true", Some(Standard)),
        RedirectCase::served("std_link_with_std_flag_and_cookie", "/pubmed?cmd=link&ncbi_mmode=std&linkname=pubmed_pubmed&p$mobile=true&uid=17328369", Some(Standard)),
        // Standard cookie beats mobile detection
        RedirectCase::served("std_homepage_with_standard_cookie", "/pubmed?p$mobile=true", Some(Standard)),
        RedirectCase::served("std_search_with_std_cookie", "/pubmed?term=whale&p$mobile=true", Some(Standard)),
        RedirectCase::served("std_abstract_with_std_cookie", "/pubmed/18590863?p$mobile=true", Some(Standard)),
        RedirectCase::served("std_link_with_std_cookie", "/pubmed?cmd=link&linkname=pubmed_pubmed&p$mobile=true&uid=17328369", Some(Standard)),
        // Mobile URLs are served as-is whatever the cookie
        RedirectCase::served("mob_homepage_with_std_cookie", "/m/pubmed/?p$mobile=true", Some(Standard)),
        RedirectCase::served("mob_abstract_with_std_cookie", "/m/pubmed/18066186/?p$mobile=true", Some(Standard)),
        RedirectCase::served("mob_search_with_std_cookie", "/m/pubmed/?term=shostakovich&p$mobile=true", Some(Standard)),
        RedirectCase::served("mob_link_with_std_cookie", "/m/pubmed/123456/related/", Some(Standard)),
        RedirectCase::served("mob_homepage_with_mobile_cookie", "/m/pubmed/?p$mobile=true", Some(Mobile)),
        RedirectCase::served("mob_abstract_with_mobile_cookie", "/m/pubmed/18066186/?p$mobile=true", Some(Mobile)),
        RedirectCase::served("mob_search_with_mobile_cookie", "/m/pubmed/?term=breast+cancer&p$mobile=true", Some(Mobile)),
        RedirectCase::served("mob_link_with_mobile_cookie", "/m/pubmed/123456/related/", Some(Mobile)),
        RedirectCase::served("mob_homepage", "/m/pubmed/?p$mobile=true", None),
        RedirectCase::served("mob_abstract", "/m/pubmed/18066186/?p$mobile=true", None),
        RedirectCase::served("mob_search", "/m/pubmed/?term=breast%20cancer&p$mobile=true", None),
        RedirectCase::served("mob_link", "/m/pubmed/123456/related/", None),
    ]
}
