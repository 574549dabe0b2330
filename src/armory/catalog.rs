//! Catalog loading and the built-in tool set.
//!
//! The catalog lives in `tools.json` under the config directory. On first
//! run a default catalog covering the common CTF workflow is written out;
//! after that the file is the source of truth and users can extend it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ArmoryError, Result};
use crate::model::{Category, ParameterSpec, ToolSpec};

const CATALOG_FILENAME: &str = "tools.json";

/// All tool categories, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: IndexMap<String, Category>,
}

/// A tool located in the catalog, with its addressing context.
#[derive(Debug, Clone, Copy)]
pub struct ToolRef<'a> {
    pub category_id: &'a str,
    pub category_name: &'a str,
    pub tool_id: &'a str,
    pub spec: &'a ToolSpec,
}

impl Catalog {
    /// Load the catalog, writing the default one first if none exists.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let path = config_dir.as_ref().join(CATALOG_FILENAME);
        if !path.exists() {
            let catalog = Self::builtin();
            catalog.save(&config_dir)?;
            info!(path = %path.display(), "created default tool catalog");
            return Ok(catalog);
        }

        let content = fs::read_to_string(&path).map_err(ArmoryError::Io)?;
        let catalog: Catalog = serde_json::from_str(&content)
            .map_err(|e| ArmoryError::Config(format!("invalid tools.json: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ArmoryError::Io)?;
        }
        let path = config_dir.join(CATALOG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ArmoryError::Serialization)?;
        fs::write(path, content).map_err(ArmoryError::Io)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for category in self.categories.values() {
            for (tool_id, spec) in &category.tools {
                spec.validate(tool_id)?;
            }
        }
        Ok(())
    }

    pub fn tool_count(&self) -> usize {
        self.categories.values().map(|c| c.tools.len()).sum()
    }

    /// Iterate every tool with its category context.
    pub fn tools(&self) -> impl Iterator<Item = ToolRef<'_>> {
        self.categories.iter().flat_map(|(cat_id, category)| {
            category.tools.iter().map(move |(tool_id, spec)| ToolRef {
                category_id: cat_id,
                category_name: &category.name,
                tool_id,
                spec,
            })
        })
    }

    /// Find a tool by catalog id, falling back to the executable name.
    pub fn find_tool(&self, name: &str) -> Option<ToolRef<'_>> {
        self.tools()
            .find(|t| t.tool_id == name)
            .or_else(|| self.tools().find(|t| t.spec.command == name))
    }

    /// The catalog shipped on first run.
    pub fn builtin() -> Self {
        let mut categories = IndexMap::new();

        categories.insert(
            "1".to_string(),
            Category {
                name: "Web Application Testing".to_string(),
                description: "Tools for web application security testing".to_string(),
                tools: [
                    (
                        "gobuster".to_string(),
                        tool(
                            "gobuster",
                            "Fast directory/file brute-forcer",
                            "gobuster",
                            &[
                                (
                                    "mode",
                                    ParameterSpec::choice(
                                        "Gobuster mode",
                                        &["dir", "dns", "vhost"],
                                    )
                                    .with_default("dir"),
                                ),
                                ("target", ParameterSpec::input("Target URL/IP/Domain").required()),
                                (
                                    "wordlist",
                                    ParameterSpec::input("Wordlist path")
                                        .with_default("/usr/share/wordlists/dirb/common.txt"),
                                ),
                                (
                                    "extensions",
                                    ParameterSpec::input("File extensions (comma-separated)")
                                        .with_default("php,html,txt"),
                                ),
                                (
                                    "threads",
                                    ParameterSpec::input("Number of threads").with_default("10"),
                                ),
                            ],
                            "gobuster {mode} -u {target} -w {wordlist} -x {extensions} -t {threads}",
                            &["gobuster dir -u http://target.com -w /usr/share/wordlists/dirb/common.txt"],
                        ),
                    ),
                    (
                        "sqlmap".to_string(),
                        tool(
                            "sqlmap",
                            "Automatic SQL injection testing tool",
                            "sqlmap",
                            &[
                                ("target", ParameterSpec::input("Target URL").required()),
                                ("data", ParameterSpec::input("POST data (optional)")),
                                ("cookie", ParameterSpec::input("HTTP Cookie header value")),
                                (
                                    "technique",
                                    ParameterSpec::choice(
                                        "SQL injection techniques",
                                        &["B", "E", "U", "S", "T"],
                                    ),
                                ),
                                (
                                    "batch",
                                    ParameterSpec::boolean(
                                        "Never ask for user input, use default behavior",
                                        true,
                                    ),
                                ),
                            ],
                            "sqlmap -u {target} {data_flag} {cookie_flag} {technique_flag} {batch_flag}",
                            &["sqlmap -u 'http://target.com/vulnerable.php?id=1' --batch"],
                        ),
                    ),
                    (
                        "nikto".to_string(),
                        tool(
                            "nikto",
                            "Web server vulnerability scanner",
                            "nikto",
                            &[
                                ("host", ParameterSpec::input("Target host").required()),
                                ("port", ParameterSpec::input("Target port").with_default("80")),
                                ("ssl", ParameterSpec::boolean("Use SSL/HTTPS", false)),
                            ],
                            "nikto -h {host} -p {port} {ssl_flag}",
                            &["nikto -h target.com", "nikto -h target.com -p 443 -ssl"],
                        ),
                    ),
                ]
                .into_iter()
                .collect(),
            },
        );

        categories.insert(
            "2".to_string(),
            Category {
                name: "Network Reconnaissance & Scanning".to_string(),
                description: "Network discovery and reconnaissance tools".to_string(),
                tools: [
                    (
                        "nmap".to_string(),
                        tool(
                            "nmap",
                            "Network discovery and security auditing",
                            "nmap",
                            &[
                                ("target", ParameterSpec::input("Target IP/Network/Host").required()),
                                (
                                    "scan_type",
                                    ParameterSpec::choice(
                                        "Scan type",
                                        &["-sS", "-sT", "-sU", "-sA", "-sV", "-sC"],
                                    )
                                    .with_default("-sS"),
                                ),
                                (
                                    "ports",
                                    ParameterSpec::input("Port range").with_default("1-1000"),
                                ),
                                (
                                    "timing",
                                    ParameterSpec::choice(
                                        "Timing template",
                                        &["-T0", "-T1", "-T2", "-T3", "-T4", "-T5"],
                                    )
                                    .with_default("-T4"),
                                ),
                            ],
                            "nmap {scan_type} -p {ports} {timing} {target}",
                            &["nmap -sS -p 1-1000 target.com", "nmap -sV -sC -p- target.com"],
                        ),
                    ),
                    (
                        "masscan".to_string(),
                        tool(
                            "masscan",
                            "Fast port scanner",
                            "masscan",
                            &[
                                ("target", ParameterSpec::input("Target IP/Network").required()),
                                (
                                    "ports",
                                    ParameterSpec::input("Port range").with_default("1-1000"),
                                ),
                                (
                                    "rate",
                                    ParameterSpec::input("Packets per second").with_default("1000"),
                                ),
                            ],
                            "masscan {target} -p {ports} --rate {rate}",
                            &["masscan 10.0.0.0/8 -p 80,443 --rate 1000"],
                        ),
                    ),
                ]
                .into_iter()
                .collect(),
            },
        );

        categories.insert(
            "3".to_string(),
            Category {
                name: "Binary Analysis & Reverse Engineering".to_string(),
                description: "Tools for binary analysis and reverse engineering".to_string(),
                tools: [
                    (
                        "radare2".to_string(),
                        tool(
                            "radare2",
                            "Reverse engineering framework",
                            "r2",
                            &[
                                ("file", ParameterSpec::input("Binary file to analyze").required()),
                                (
                                    "analyze",
                                    ParameterSpec::boolean("Perform automatic analysis", true),
                                ),
                            ],
                            "r2 {analyze_flag} {file}",
                            &["r2 -A binary_file"],
                        ),
                    ),
                    (
                        "strings".to_string(),
                        tool(
                            "strings",
                            "Extract printable strings from files",
                            "strings",
                            &[
                                ("file", ParameterSpec::input("File to analyze").required()),
                                (
                                    "min_length",
                                    ParameterSpec::input("Minimum string length").with_default("4"),
                                ),
                            ],
                            "strings -n {min_length} {file}",
                            &["strings binary_file", "strings -n 8 binary_file"],
                        ),
                    ),
                ]
                .into_iter()
                .collect(),
            },
        );

        categories.insert(
            "4".to_string(),
            Category {
                name: "Forensics & Steganography".to_string(),
                description: "Digital forensics and steganography tools".to_string(),
                tools: [
                    (
                        "binwalk".to_string(),
                        tool(
                            "binwalk",
                            "Firmware analysis tool",
                            "binwalk",
                            &[
                                ("file", ParameterSpec::input("File to analyze").required()),
                                ("extract", ParameterSpec::boolean("Extract found files", false)),
                            ],
                            "binwalk {extract_flag} {file}",
                            &["binwalk firmware.bin", "binwalk -e firmware.bin"],
                        ),
                    ),
                    (
                        "exiftool".to_string(),
                        tool(
                            "exiftool",
                            "Metadata reader/writer",
                            "exiftool",
                            &[("file", ParameterSpec::input("File to analyze").required())],
                            "exiftool {file}",
                            &["exiftool image.jpg"],
                        ),
                    ),
                ]
                .into_iter()
                .collect(),
            },
        );

        categories.insert(
            "5".to_string(),
            Category {
                name: "Cryptography & Password Cracking".to_string(),
                description: "Cryptography and password cracking tools".to_string(),
                tools: [
                    (
                        "john".to_string(),
                        tool(
                            "john",
                            "John the Ripper password cracker",
                            "john",
                            &[
                                ("hashfile", ParameterSpec::input("Hash file to crack").required()),
                                (
                                    "wordlist",
                                    ParameterSpec::input("Wordlist path")
                                        .with_default("/usr/share/wordlists/rockyou.txt"),
                                ),
                                ("format", ParameterSpec::input("Hash format (optional)")),
                            ],
                            "john {format_flag} --wordlist={wordlist} {hashfile}",
                            &["john --wordlist=/usr/share/wordlists/rockyou.txt hashes.txt"],
                        ),
                    ),
                    (
                        "hashcat".to_string(),
                        tool(
                            "hashcat",
                            "Advanced password recovery",
                            "hashcat",
                            &[
                                (
                                    "attack_mode",
                                    ParameterSpec::choice(
                                        "Attack mode (0=dict, 1=combinator, 3=mask)",
                                        &["0", "1", "3"],
                                    )
                                    .with_default("0"),
                                ),
                                (
                                    "hash_type",
                                    ParameterSpec::input("Hash type (0=MD5, 1000=NTLM, etc.)")
                                        .with_default("0"),
                                ),
                                ("hashfile", ParameterSpec::input("Hash file").required()),
                                (
                                    "wordlist",
                                    ParameterSpec::input("Wordlist path")
                                        .with_default("/usr/share/wordlists/rockyou.txt"),
                                ),
                            ],
                            "hashcat -m {hash_type} -a {attack_mode} {hashfile} {wordlist}",
                            &["hashcat -m 0 -a 0 hashes.txt /usr/share/wordlists/rockyou.txt"],
                        ),
                    ),
                ]
                .into_iter()
                .collect(),
            },
        );

        Catalog { categories }
    }
}

fn tool(
    name: &str,
    description: &str,
    command: &str,
    params: &[(&str, ParameterSpec)],
    template: &str,
    examples: &[&str],
) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: description.to_string(),
        command: command.to_string(),
        parameters: params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        command_template: template.to_string(),
        examples: examples.iter().map(|e| e.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::CommandTemplate;

    #[test]
    fn builtin_catalog_validates() {
        Catalog::builtin().validate().unwrap();
    }

    #[test]
    fn builtin_templates_parse_and_cover_their_parameters() {
        let catalog = Catalog::builtin();
        for t in catalog.tools() {
            let tmpl = CommandTemplate::parse(&t.spec.command_template)
                .unwrap_or_else(|e| panic!("{}: {}", t.tool_id, e));
            for param in tmpl.params() {
                assert!(
                    t.spec.parameters.contains_key(param),
                    "{}: template references undeclared parameter '{}'",
                    t.tool_id,
                    param
                );
            }
        }
    }

    #[test]
    fn load_writes_defaults_on_first_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(temp_dir.path()).unwrap();
        assert!(catalog.tool_count() > 0);
        assert!(temp_dir.path().join(CATALOG_FILENAME).exists());

        // Second load reads the file back identically.
        let reloaded = Catalog::load(temp_dir.path()).unwrap();
        assert_eq!(reloaded.tool_count(), catalog.tool_count());
    }

    #[test]
    fn load_rejects_corrupt_catalog() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CATALOG_FILENAME), "[oops").unwrap();
        assert!(matches!(
            Catalog::load(temp_dir.path()),
            Err(ArmoryError::Config(_))
        ));
    }

    #[test]
    fn find_tool_by_id_and_by_command() {
        let catalog = Catalog::builtin();

        let by_id = catalog.find_tool("radare2").unwrap();
        assert_eq!(by_id.spec.command, "r2");
        assert_eq!(by_id.category_id, "3");

        let by_command = catalog.find_tool("r2").unwrap();
        assert_eq!(by_command.tool_id, "radare2");

        assert!(catalog.find_tool("not-a-tool").is_none());
    }

    #[test]
    fn categories_preserve_declaration_order() {
        let catalog = Catalog::builtin();
        let ids: Vec<_> = catalog.categories.keys().collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }
}
