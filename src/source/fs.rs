//! File system sources.

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use super::{
    Source,
    add_decoded,
};
use crate::bundle::Bundle;
use crate::datatype::{
    DataType,
    DataTypeRegistry,
};
use crate::error::{
    Error,
    Result,
};

/// Translation files found by walking directories.
#[derive(Debug, Clone)]
pub struct DirSource {
    data_type: DataType,
    recursive: bool,
    dirs: Vec<PathBuf>,
}

impl DirSource {
    pub fn new<I, P>(data_type: DataType, recursive: bool, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { data_type, recursive, dirs: dirs.into_iter().map(Into::into).collect() }
    }

    /// Matching files under `dir`, in file name order.
    fn files_in(&self, dir: &Path, registry: &DataTypeRegistry) -> Result<Vec<PathBuf>> {
        let metadata = std::fs::metadata(dir)
            .map_err(|source| Error::Source { path: dir.to_path_buf(), source })?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory { path: dir.to_path_buf() });
        }

        let filter = registry.file_filter(&self.data_type)?;

        let mut builder = WalkBuilder::new(dir);
        builder
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        if !self.recursive {
            builder.max_depth(Some(1));
        }

        let mut files = Vec::new();
        for result in builder.build() {
            let entry =
                result.map_err(|source| Error::Walk { path: dir.to_path_buf(), source })?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if filter.as_ref().is_some_and(|filter| !filter.is_match(path)) {
                tracing::trace!(path = %path.display(), "Skipping file not matching data type");
                continue;
            }
            files.push(entry.into_path());
        }
        Ok(files)
    }
}

impl Source for DirSource {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        let registry = DataTypeRegistry::global();
        if !registry.contains(&self.data_type) {
            return Err(Error::UnknownDataType(self.data_type.clone()));
        }

        for dir in &self.dirs {
            let files = self.files_in(dir, registry)?;
            tracing::debug!(
                dir = %dir.display(),
                files = files.len(),
                "Loading translation directory"
            );

            for path in files {
                load_file(bundle, &self.data_type, &path)?;
            }
        }
        Ok(())
    }
}

/// Explicitly listed translation files.
#[derive(Debug, Clone)]
pub struct FileSource {
    data_type: DataType,
    files: Vec<PathBuf>,
}

impl FileSource {
    pub fn new<I, P>(data_type: DataType, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { data_type, files: files.into_iter().map(Into::into).collect() }
    }
}

impl Source for FileSource {
    fn apply(&mut self, bundle: &mut Bundle) -> Result<()> {
        for path in &self.files {
            load_file(bundle, &self.data_type, path)?;
        }
        Ok(())
    }
}

fn load_file(bundle: &mut Bundle, data_type: &DataType, path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "Loading translation file");

    let bytes = std::fs::read(path)
        .map_err(|source| Error::Source { path: path.to_path_buf(), source })?;
    add_decoded(bundle, data_type, &bytes).map_err(|e| e.in_file(path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::fs;

    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::source::{
        from_dirs,
        from_files,
    };
    use crate::test_utils::locale;

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
        fs::write(path, contents).expect("write file");
    }

    fn temp_dir() -> TempDir {
        tempfile::Builder::new().prefix("i18n-bundle").tempdir().expect("temp dir")
    }

    fn document(language: &str, text: &str) -> String {
        format!(r#"{{"language": "{language}", "translations": {{"test_1": "{text}"}}}}"#)
    }

    #[fixture]
    fn locales_dir() -> TempDir {
        let temp = temp_dir();
        let root = temp.path();
        write(root, "en.json", &document("en", "Test 1"));
        write(root, "es/es.json", &document("es", "Prueba 1"));
        write(root, ".hidden/fr.json", &document("fr", "Essai 1"));
        write(root, ".it.json", &document("it", "Prova 1"));
        write(root, "README.md", "# not a translation");
        temp
    }

    fn languages(bundle: &Bundle) -> Vec<String> {
        bundle.languages().iter().map(ToString::to_string).collect()
    }

    #[rstest]
    fn recursive_walk_skips_hidden_and_foreign_files(locales_dir: TempDir) {
        let bundle =
            Bundle::new(locale("en"), [from_dirs(DataType::JSON, true, [locales_dir.path()])])
                .unwrap();

        assert_eq!(languages(&bundle), ["en", "es"]);
        assert_eq!(bundle.translate(&locale("es"), "test_1"), "Prueba 1");
    }

    #[rstest]
    fn non_recursive_walk_ignores_subdirectories(locales_dir: TempDir) {
        let bundle =
            Bundle::new(locale("en"), [from_dirs(DataType::JSON, false, [locales_dir.path()])])
                .unwrap();

        assert_eq!(languages(&bundle), ["en"]);
    }

    #[rstest]
    fn missing_dir_is_source_error() {
        let temp = temp_dir();
        let missing = temp.path().join("missing");

        let result = Bundle::new(locale("en"), [from_dirs(DataType::JSON, true, [&missing])]);

        assert!(
            matches!(&result, Err(Error::Source { path, .. }) if *path == missing),
            "{result:?}"
        );
    }

    #[rstest]
    fn file_is_not_a_directory(locales_dir: TempDir) {
        let file = locales_dir.path().join("en.json");

        let result = Bundle::new(locale("en"), [from_dirs(DataType::JSON, true, [&file])]);

        assert!(matches!(result, Err(Error::NotADirectory { .. })), "{result:?}");
    }

    #[rstest]
    fn malformed_file_is_attributed(locales_dir: TempDir) {
        write(locales_dir.path(), "broken.json", "{ nope");

        let result =
            Bundle::new(locale("en"), [from_dirs(DataType::JSON, false, [locales_dir.path()])]);

        let error = result.unwrap_err();
        assert!(
            matches!(&error, Error::File { path, .. } if path.ends_with("broken.json")),
            "{error:?}"
        );
        assert!(matches!(error.root(), Error::Decode { .. }), "{error:?}");
    }

    #[rstest]
    fn unknown_data_type_fails(locales_dir: TempDir) {
        let result = Bundle::new(
            locale("en"),
            [from_dirs(DataType::new("UNREGISTERED"), true, [locales_dir.path()])],
        );

        assert!(matches!(result, Err(Error::UnknownDataType(_))), "{result:?}");
    }

    #[rstest]
    fn files_are_loaded_without_filtering(locales_dir: TempDir) {
        let odd_name = locales_dir.path().join("translations.txt");
        fs::write(&odd_name, document("de", "Test 1 (de)")).unwrap();

        let bundle = Bundle::new(locale("en"), [from_files(DataType::JSON, [&odd_name])]).unwrap();

        assert_eq!(bundle.translate(&locale("de"), "test_1"), "Test 1 (de)");
    }

    #[rstest]
    fn missing_file_is_source_error() {
        let temp = temp_dir();

        let result =
            Bundle::new(locale("en"), [from_files(DataType::JSON, [temp.path().join("x.json")])]);

        assert!(matches!(result, Err(Error::Source { .. })), "{result:?}");
    }

    #[rstest]
    fn toml_directory_skips_json_files() {
        let temp = temp_dir();
        write(
            temp.path(),
            "en.toml",
            "language = \"en\"\n[translations.errors]\ntest_4 = \"Error 1\"\n",
        );
        write(temp.path(), "en.json", r#"{"language": "en", "translations": {"x": "y"}}"#);

        let bundle =
            Bundle::new(locale("en"), [from_dirs(DataType::TOML, true, [temp.path()])]).unwrap();

        assert_eq!(bundle.get(&locale("en"), "errors.test_4"), Some("Error 1"));
        assert_eq!(bundle.get(&locale("en"), "x"), None);
    }
}
