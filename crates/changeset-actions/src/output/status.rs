use changeset_core::{Locale, PackageDescriptor};
use changeset_operations::operations::StatusOutput;
use changeset_operations::render::{MessageCatalog, catalog};
use changeset_operations::{PlannedRelease, ReleasePlan};

pub(crate) trait StatusFormatter {
    fn format_status(&self, output: &StatusOutput) -> String;
}

pub(crate) struct PlainTextStatusFormatter {
    locale: Locale,
}

impl PlainTextStatusFormatter {
    pub(crate) fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn format_plan(output: &mut String, messages: &dyn MessageCatalog, plan: &ReleasePlan) {
        if !plan.has_changesets() {
            output.push_str(messages.plan_empty());
            output.push('\n');
            return;
        }

        let publishable: Vec<&PlannedRelease> = plan
            .releases
            .iter()
            .filter(|release| release.bump_type.is_publishable())
            .collect();
        output.push_str(&messages.plan_summary(publishable.len()));
        output.push('\n');

        for changeset in &plan.changesets {
            output.push_str(&format!("  .changeset/{}.md\n", changeset.id));
        }
        if let Some(pre_state) = &plan.pre_state {
            output.push_str(&format!("  (pre: {})\n", pre_state.tag));
        }

        if !publishable.is_empty() {
            output.push('\n');
        }
        for release in publishable {
            output.push_str(&Self::format_release(release));
        }
    }

    fn format_release(release: &PlannedRelease) -> String {
        let versions = match (&release.current_version, &release.new_version) {
            (Some(current), Some(new)) => format!(": {current} -> {new}"),
            _ => String::new(),
        };
        let dependents = if release.dependents.is_empty() {
            String::new()
        } else {
            format!(" <- {}", release.dependents.join(", "))
        };
        format!(
            "  {}{versions} ({}){dependents}\n",
            release.name, release.bump_type
        )
    }

    fn format_unknown_packages(
        output: &mut String,
        messages: &dyn MessageCatalog,
        plan: &ReleasePlan,
    ) {
        if plan.unknown_packages.is_empty() {
            return;
        }

        output.push('\n');
        output.push_str(messages.unknown_packages());
        output.push('\n');
        for name in &plan.unknown_packages {
            output.push_str(&format!("  {name}\n"));
        }
    }

    fn format_changed_packages(
        output: &mut String,
        messages: &dyn MessageCatalog,
        packages: &[PackageDescriptor],
    ) {
        output.push('\n');
        if packages.is_empty() {
            for line in messages.no_changed_packages() {
                output.push_str(line);
                output.push('\n');
            }
            return;
        }

        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        output.push_str(&messages.packages_detected(&names));
        output.push('\n');

        let uncovered: Vec<&str> = packages
            .iter()
            .filter(|p| p.bump_type.is_none_or(|bump| !bump.is_publishable()))
            .map(|p| p.name.as_str())
            .collect();
        if uncovered.is_empty() {
            return;
        }
        output.push_str(messages.packages_without_changeset());
        output.push('\n');
        for name in uncovered {
            output.push_str(&format!("  {name}\n"));
        }
    }
}

impl StatusFormatter for PlainTextStatusFormatter {
    fn format_status(&self, status: &StatusOutput) -> String {
        let messages = catalog(self.locale);
        let mut output = String::new();

        Self::format_plan(&mut output, messages, &status.plan);
        Self::format_unknown_packages(&mut output, messages, &status.plan);
        if let Some(packages) = &status.changed_packages {
            Self::format_changed_packages(&mut output, messages, packages);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use changeset_core::{BumpType, Changeset};
    use semver::Version;

    use super::*;

    fn release(name: &str, bump_type: BumpType, from: &str, to: &str) -> PlannedRelease {
        PlannedRelease {
            name: name.to_string(),
            bump_type,
            dependents: Vec::new(),
            current_version: Some(Version::parse(from).expect("version")),
            new_version: Some(Version::parse(to).expect("version")),
        }
    }

    fn changeset(id: &str) -> Changeset {
        Changeset {
            id: id.to_string(),
            summary: String::new(),
            releases: Vec::new(),
        }
    }

    #[test]
    fn empty_plan_uses_localized_message() {
        let status = StatusOutput {
            plan: ReleasePlan::default(),
            changed_packages: None,
        };

        let text = PlainTextStatusFormatter::new(Locale::En).format_status(&status);

        assert_eq!(text, "This PR includes no changesets\n");
    }

    #[test]
    fn lists_releases_with_versions_and_dependents() {
        let mut core = release("@acme/core", BumpType::Major, "1.2.0", "2.0.0");
        core.dependents = vec!["@acme/ui".to_string()];
        let status = StatusOutput {
            plan: ReleasePlan {
                changesets: vec![changeset("calm-owls-run")],
                releases: vec![core, release("@acme/ui", BumpType::None, "0.4.0", "0.4.0")],
                unknown_packages: vec!["ghost".to_string()],
                pre_state: None,
            },
            changed_packages: None,
        };

        let text = PlainTextStatusFormatter::new(Locale::En).format_status(&status);

        assert!(text.starts_with("This PR includes changesets to release 1 package\n"));
        assert!(text.contains("  .changeset/calm-owls-run.md\n"));
        assert!(text.contains("  @acme/core: 1.2.0 -> 2.0.0 (major) <- @acme/ui\n"));
        assert!(!text.contains("@acme/ui: 0.4.0"));
        assert!(text.contains("  ghost\n"));
    }

    #[test]
    fn changed_packages_without_changeset_are_listed() {
        let mut covered = PackageDescriptor::new("foo", "packages/foo");
        covered.bump_type = Some(BumpType::Patch);
        let status = StatusOutput {
            plan: ReleasePlan::default(),
            changed_packages: Some(vec![covered, PackageDescriptor::new("bar", "packages/bar")]),
        };

        let text = PlainTextStatusFormatter::new(Locale::En).format_status(&status);

        let uncovered = text
            .split_once(catalog(Locale::En).packages_without_changeset())
            .map(|(_, rest)| rest)
            .expect("uncovered section");
        assert_eq!(uncovered, "\n  bar\n");
    }
}
