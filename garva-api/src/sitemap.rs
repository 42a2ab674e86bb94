use chrono::{DateTime, Utc};

struct Entry {
    path: &'static str,
    change_frequency: &'static str,
    priority: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        path: "",
        change_frequency: "daily",
        priority: "1.0",
    },
    Entry {
        path: "/admin",
        change_frequency: "monthly",
        priority: "0.3",
    },
];

/// `sitemap.xml` for the public site rooted at `site_url`.
pub fn render(site_url: &str, last_modified: DateTime<Utc>) -> String {
    let site_url = site_url.trim_end_matches('/');
    let lastmod = last_modified.format("%Y-%m-%d");

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in ENTRIES {
        xml.push_str(&format!(
            "  <url>\n    <loc>{site_url}{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            entry.path, entry.change_frequency, entry.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}
