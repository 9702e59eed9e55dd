use changeset_core::Locale;

/// Localized message parts. Every locale provides every message, so rendered
/// text never contains an untranslated or unsubstituted fragment.
pub trait MessageCatalog: Sync {
    fn packages_detected(&self, names: &[&str]) -> String;
    fn skip_label_hint(&self, label: &str) -> String;
    fn add_changeset_prompt(&self) -> &'static str;
    fn changeset_placeholder(&self) -> &'static str;
    fn no_changed_packages(&self) -> [&'static str; 2];
    fn packages_without_changeset(&self) -> &'static str;
    fn missing_changeset(&self, skip_label: Option<&str>) -> String;
    fn skipped_by_label(&self, label: &str) -> String;
    fn skipped_by_branch(&self, base: &str, head: &str) -> String;

    fn plan_summary(&self, releases: usize) -> String;
    fn plan_empty(&self) -> &'static str;
    fn plan_without_releases(&self) -> &'static str;
    fn unknown_packages(&self) -> &'static str;
    fn table_header(&self) -> [&'static str; 2];

    fn notes_headers_only(&self, max_chars: usize) -> String;
    fn notes_omitted(&self, max_chars: usize) -> String;

    fn canary_empty(&self, packages_dir: &str) -> String;
    fn canary_error(&self) -> &'static str;
    fn canary_missing_changeset(&self) -> &'static str;

    fn invalid_packages_dir(&self, entry: &str) -> String;
}

struct English;

impl MessageCatalog for English {
    fn packages_detected(&self, names: &[&str]) -> String {
        let list = format!("`{}`", names.join("`, `"));
        if names.len() > 1 {
            format!("Changes were detected in the {list} packages.")
        } else {
            format!("Changes were detected in the {list} package.")
        }
    }

    fn skip_label_hint(&self, label: &str) -> String {
        format!("If no version change is required, add the `{label}` label to this PR.")
    }

    fn add_changeset_prompt(&self) -> &'static str {
        "To add a changeset to .changeset, pick one of the options below."
    }

    fn changeset_placeholder(&self) -> &'static str {
        "<!-- Describe your change. (Remove this line and write a clear description below.) -->"
    }

    fn no_changed_packages(&self) -> [&'static str; 2] {
        [
            "No changed files were found. Please check your commits.",
            "Changes may not be detected when packages_dir is not set or only markdown files changed.",
        ]
    }

    fn packages_without_changeset(&self) -> &'static str {
        "Changed packages without a changeset in this PR:"
    }

    fn missing_changeset(&self, skip_label: Option<&str>) -> String {
        let fallback = match skip_label {
            Some(label) => format!("please add {label} to the label."),
            None => "please ignore this CI.".to_string(),
        };
        format!(
            "Please add a .changeset file according to the comment guidelines. \
             If no version change is required, {fallback}"
        )
    }

    fn skipped_by_label(&self, label: &str) -> String {
        format!(
            "The label corresponding to `skip_label` has been added to this PR, \
             so the CI will be skipped for this PR. (Label: {label})"
        )
    }

    fn skipped_by_branch(&self, base: &str, head: &str) -> String {
        format!("The base branch is {base}, or the head branch is {head}, so detectAdd is skipped.")
    }

    fn plan_summary(&self, releases: usize) -> String {
        if releases == 1 {
            "This PR includes changesets to release 1 package".to_string()
        } else {
            format!("This PR includes changesets to release {releases} packages")
        }
    }

    fn plan_empty(&self) -> &'static str {
        "This PR includes no changesets"
    }

    fn plan_without_releases(&self) -> &'static str {
        "When changesets are added to this PR, you'll see the packages that this PR \
         includes changesets for and the associated semver types"
    }

    fn unknown_packages(&self) -> &'static str {
        "Changesets name packages that are not in the workspace:"
    }

    fn table_header(&self) -> [&'static str; 2] {
        ["Name", "Type"]
    }

    fn notes_headers_only(&self, max_chars: usize) -> String {
        format!(
            "> The package changelogs exceed {max_chars} characters, \
             so the changes of each package are omitted."
        )
    }

    fn notes_omitted(&self, max_chars: usize) -> String {
        format!(
            "> The package changelogs exceed {max_chars} characters, \
             so the release notes of all packages are omitted."
        )
    }

    fn canary_empty(&self, packages_dir: &str) -> String {
        format!(
            "No changed files exist under the {packages_dir} path, no packages have been deployed."
        )
    }

    fn canary_error(&self) -> &'static str {
        "An error occurred during the canary deployment."
    }

    fn canary_missing_changeset(&self) -> &'static str {
        "Please specify the detect version for a valid canary version deployment"
    }

    fn invalid_packages_dir(&self, entry: &str) -> String {
        format!(
            "The packages_dir parameter injected into this action is incorrect ('{entry}'). \
             Please format it as (string, string1)."
        )
    }
}

struct Korean;

impl MessageCatalog for Korean {
    fn packages_detected(&self, names: &[&str]) -> String {
        let suffix = if names.len() > 1 { "들" } else { "" };
        format!("`{}` 패키지{suffix}에 변경사항이 감지되었습니다.", names.join("`, `"))
    }

    fn skip_label_hint(&self, label: &str) -> String {
        format!("만약, 버전 변경이 필요 없다면 {label}을 label에 추가해주세요.")
    }

    fn add_changeset_prompt(&self) -> &'static str {
        ".changeset에 변경사항을 추가하고싶다면 아래에서 하나를 선택해주세요"
    }

    fn changeset_placeholder(&self) -> &'static str {
        "<!-- 변경된 사항을 입력해주세요. (이 줄을 지우고 하단에 명확하게 작성해주세요.) -->"
    }

    fn no_changed_packages(&self) -> [&'static str; 2] {
        [
            "변경된 파일이 없습니다. commit을 확인해주세요.",
            "packages_dir 지정이 안되어 있거나, markdown 파일만 변경점에 있다면, 탐지되지 않을 수 있습니다.",
        ]
    }

    fn packages_without_changeset(&self) -> &'static str {
        "이 PR에서 changeset이 추가되지 않은 변경 패키지:"
    }

    fn missing_changeset(&self, skip_label: Option<&str>) -> String {
        let fallback = match skip_label {
            Some(label) => format!("{label}을 label에 추가해주세요."),
            None => "해당 ci는 무시해주세요.".to_string(),
        };
        format!(
            "comment의 지침에 따라, .changeset 파일을 추가해주세요. 만약, 버전변경이 필요 없다면 {fallback}"
        )
    }

    fn skipped_by_label(&self, label: &str) -> String {
        format!(
            "skip_label에 해당하는 label이 해당 PR에 추가되어 있어, 해당 PR에서는 ci를 스킵합니다. (해당 라벨 : {label})"
        )
    }

    fn skipped_by_branch(&self, base: &str, head: &str) -> String {
        format!("base 브랜치가 {base} 이거나, head 브랜치가 {head} 여서 detectAdd를 스킵합니다.")
    }

    fn plan_summary(&self, releases: usize) -> String {
        format!("이 PR은 다음 {releases}개 패키지를 배포하는 변경사항을 포함합니다.")
    }

    fn plan_empty(&self) -> &'static str {
        "이 PR은 어떤 변경사항도 포함하지 않습니다."
    }

    fn plan_without_releases(&self) -> &'static str {
        "변경사항이 PR에 추가되면 이 PR에 포함된 패키지와 관련된 semver 유형을 확인할 수 있습니다."
    }

    fn unknown_packages(&self) -> &'static str {
        "워크스페이스에 없는 패키지를 지정한 changeset이 있습니다:"
    }

    fn table_header(&self) -> [&'static str; 2] {
        ["이름", "유형"]
    }

    fn notes_headers_only(&self, max_chars: usize) -> String {
        format!("> 패키지 변경 로그가 {max_chars}자를 초과하여, 각 패키지의 변경 정보가 생략됩니다.")
    }

    fn notes_omitted(&self, max_chars: usize) -> String {
        format!("> 패키지 변경 로그가 {max_chars}자를 초과하여, 모든 패키지의 릴리즈 정보가 생략됩니다.")
    }

    fn canary_empty(&self, packages_dir: &str) -> String {
        format!("{packages_dir} 하위 변경된 파일이 없어, 배포된 패키지가 없습니다.")
    }

    fn canary_error(&self) -> &'static str {
        "카나리 배포 도중 에러가 발생했습니다."
    }

    fn canary_missing_changeset(&self) -> &'static str {
        "올바른 카나리 버전 배포를 위해 detect version을 명시해주세요"
    }

    fn invalid_packages_dir(&self, entry: &str) -> String {
        format!(
            "해당 action에 주입된 packages_dir parameter가 잘못되었습니다 ('{entry}'). (string, string1)의 형식으로 작성해주세요."
        )
    }
}

#[must_use]
pub fn catalog(locale: Locale) -> &'static dyn MessageCatalog {
    match locale {
        Locale::En => &English,
        Locale::Ko => &Korean,
    }
}
