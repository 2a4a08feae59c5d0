//! Example descriptors and the URL templates they are built from

use super::Platform;
use crate::config::Config;
use crate::upstream::DirectoryEntry;

/// One example project, with a redirect target per platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub name: String,
    pub github: String,
    pub netlify: String,
    pub stackblitz: String,
    pub codesandbox: String,
}

impl Example {
    /// Redirect target for `platform`
    pub fn url(&self, platform: Platform) -> &str {
        match platform {
            Platform::Stackblitz => &self.stackblitz,
            Platform::Codesandbox => &self.codesandbox,
            Platform::Netlify => &self.netlify,
            Platform::Github => &self.github,
        }
    }
}

/// Source browser used when a listing entry carries no `html_url`
const GITHUB_BASE: &str = "https://github.com";

/// Everything needed to turn a directory entry into an [`Example`]
#[derive(Debug, Clone)]
pub struct UrlTemplates {
    pub owner: String,
    pub repo: String,
    pub examples_path: String,
    pub netlify_url: String,
    pub stackblitz_base: String,
    pub codesandbox_base: String,
}

impl UrlTemplates {
    pub fn from_config(config: &Config) -> Self {
        Self {
            owner: config.upstream.owner.clone(),
            repo: config.upstream.repo.clone(),
            examples_path: config.upstream.examples_path.clone(),
            netlify_url: config.platforms.netlify_url.clone(),
            stackblitz_base: config.platforms.stackblitz_base.trim_end_matches('/').to_string(),
            codesandbox_base: config.platforms.codesandbox_base.trim_end_matches('/').to_string(),
        }
    }

    fn tree_path(&self, reference: &str, name: &str) -> String {
        format!(
            "{}/{}/tree/{reference}/{}/{name}",
            self.owner, self.repo, self.examples_path
        )
    }

    pub fn example(&self, reference: &str, entry: &DirectoryEntry) -> Example {
        let tree = self.tree_path(reference, &entry.name);
        Example {
            name: entry.name.clone(),
            github: entry
                .html_url
                .clone()
                .unwrap_or_else(|| format!("{GITHUB_BASE}/{tree}")),
            netlify: self.netlify_url.clone(),
            stackblitz: format!("{}/{tree}", self.stackblitz_base),
            codesandbox: format!("{}/{tree}", self.codesandbox_base),
        }
    }

    /// Map a contents listing to examples, dropping regular files
    pub fn examples(&self, reference: &str, entries: &[DirectoryEntry]) -> Vec<Example> {
        entries
            .iter()
            .filter(|entry| entry.is_directory())
            .map(|entry| self.example(reference, entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn astro_templates() -> UrlTemplates {
        UrlTemplates {
            owner: "withastro".to_string(),
            repo: "astro".to_string(),
            examples_path: "examples".to_string(),
            netlify_url: "https://astro.build".to_string(),
            stackblitz_base: "https://stackblitz.com/github".to_string(),
            codesandbox_base: "https://githubbox.com".to_string(),
        }
    }

    fn entry(name: &str, size: u64) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            size,
            html_url: Some(format!(
                "https://github.com/withastro/astro/tree/main/examples/{name}"
            )),
        }
    }

    #[test]
    fn test_example_urls() {
        let example = astro_templates().example("astro@1.2.3", &entry("blog", 0));
        assert_eq!(
            example.stackblitz,
            "https://stackblitz.com/github/withastro/astro/tree/astro@1.2.3/examples/blog"
        );
        assert_eq!(
            example.codesandbox,
            "https://githubbox.com/withastro/astro/tree/astro@1.2.3/examples/blog"
        );
        assert_eq!(example.netlify, "https://astro.build");
        assert_eq!(
            example.github,
            "https://github.com/withastro/astro/tree/main/examples/blog"
        );
    }

    #[test]
    fn test_url_selects_platform_field() {
        let example = astro_templates().example("latest", &entry("basics", 0));
        assert_eq!(example.url(Platform::Github), example.github);
        assert_eq!(example.url(Platform::Netlify), "https://astro.build");
        assert_eq!(example.url(Platform::Stackblitz), example.stackblitz);
        assert_eq!(example.url(Platform::Codesandbox), example.codesandbox);
    }

    #[test]
    fn test_missing_html_url_builds_tree_link() {
        let mut bare = entry("vendored", 0);
        bare.html_url = None;
        let example = astro_templates().example("latest", &bare);
        assert_eq!(
            example.github,
            "https://github.com/withastro/astro/tree/latest/examples/vendored"
        );
    }

    #[test]
    fn test_files_are_dropped() {
        let entries = vec![entry("basics", 0), entry("README.md", 512), entry("blog", 0)];
        let examples = astro_templates().examples("main", &entries);
        let names: Vec<&str> = examples.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["basics", "blog"]);
    }
}
