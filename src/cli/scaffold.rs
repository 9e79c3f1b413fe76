//! Create a project from a downloadable template.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::archive;
use crate::error::Error;

/// A project template published as a zip archive.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

/// Available templates.
pub const TEMPLATES: &[Template] = &[Template {
    name: "xmlui-invoice",
    description: "A complete business application for invoice management",
    url: "https://github.com/xmlui-org/xmlui-invoice/archive/refs/heads/hajagosnorbert/demo.zip",
}];

/// Look up a template by name.
pub fn find_template(name: &str) -> Result<&'static Template, Error> {
    TEMPLATES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| Error::UnknownTemplate(name.to_string()))
}

/// Print the template list.
pub fn print_templates() {
    println!("Available templates:");
    for template in TEMPLATES {
        println!("  {:<14} - {}", template.name, template.description);
    }
}

/// Run the scaffold command.
pub async fn run(name: &str) -> Result<PathBuf, Error> {
    let template = match find_template(name) {
        Ok(template) => template,
        Err(e) => {
            print_templates();
            return Err(e);
        }
    };

    println!("Downloading {}...", template.name);
    let staging = std::env::temp_dir().join(format!("spalaunch-{}", std::process::id()));
    fs::create_dir_all(&staging)?;
    let archive_path = staging.join(format!("{}.zip", template.name));

    let result = async {
        download(template.url, &archive_path).await?;
        install(&archive_path, &std::env::current_dir()?)
    }
    .await;

    if let Err(e) = fs::remove_dir_all(&staging) {
        warn!(path = %staging.display(), error = %e, "Failed to remove download directory");
    }

    let target = result?;
    let shown = target.file_name().map(Path::new).unwrap_or(target.as_path());
    println!();
    println!("Scaffolding complete!");
    println!("Project created in: {}", shown.display());
    println!();
    println!("Start the project by running:");
    println!();
    println!("  cd {} && spalaunch run", shown.display());

    Ok(target)
}

async fn download(url: &str, dest: &Path) -> Result<(), Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let body = response.bytes().await?;
    fs::write(dest, &body)?;
    info!(url, bytes = body.len(), "Downloaded template");
    Ok(())
}

/// Extract a template archive under `base_dir`, dropping a lone wrapper directory.
pub fn install(archive_path: &Path, base_dir: &Path) -> Result<PathBuf, Error> {
    let target = archive::extract(archive_path, base_dir)?;
    archive::collapse_single_root(&target)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::write_zip;
    use tempfile::TempDir;

    #[test]
    fn test_find_template() {
        assert_eq!(find_template("xmlui-invoice").unwrap().name, "xmlui-invoice");
        assert!(matches!(
            find_template("hello-world"),
            Err(Error::UnknownTemplate(name)) if name == "hello-world"
        ));
    }

    #[test]
    fn test_install_hoists_wrapper_directory() {
        let downloads = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let archive = downloads.path().join("xmlui-invoice.zip");
        write_zip(
            &archive,
            &[
                ("xmlui-invoice-demo/", ""),
                ("xmlui-invoice-demo/index.html", "<html></html>"),
                ("xmlui-invoice-demo/start.sh", "exit 0\n"),
            ],
        );

        let target = install(&archive, workspace.path()).unwrap();

        assert_eq!(target, workspace.path().join("xmlui-invoice"));
        assert!(target.join("index.html").is_file());
        assert!(target.join("start.sh").is_file());
        assert!(!target.join("xmlui-invoice-demo").exists());
    }

    #[test]
    fn test_install_never_overwrites() {
        let downloads = TempDir::new().unwrap();
        let workspace = TempDir::new().unwrap();
        let archive = downloads.path().join("xmlui-invoice.zip");
        write_zip(&archive, &[("index.html", "new")]);
        fs::create_dir(workspace.path().join("xmlui-invoice")).unwrap();
        fs::write(workspace.path().join("xmlui-invoice/index.html"), "mine").unwrap();

        let target = install(&archive, workspace.path()).unwrap();

        assert_eq!(target, workspace.path().join("xmlui-invoice-1"));
        assert_eq!(
            fs::read_to_string(workspace.path().join("xmlui-invoice/index.html")).unwrap(),
            "mine"
        );
    }
}
