// Shared test helpers for integration tests
//
// A fixture is a temporary directory holding a fake `.xcresult` bundle, a shell
// script that stands in for `xcresulttool`, and a settings file pointing at it.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// How the fake tool behaves for `export attachments`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportMode {
    /// Copy the attachment files and the manifest into the output directory.
    Normal,
    /// Exit non-zero with "No attachments" on stderr.
    NoAttachments,
    /// Exit non-zero with an unrelated error.
    Fail,
    /// Never finish; the settings give the export a one second limit.
    Hang,
}

pub struct FixtureBuilder {
    bundle_name: String,
    version_ok: bool,
    summary: Option<String>,
    tree: Option<String>,
    manifest: Option<String>,
    files: Vec<(String, Vec<u8>)>,
    export: ExportMode,
}

pub struct Fixture {
    pub root: TempDir,
    pub bundle: PathBuf,
    pub tool: PathBuf,
    pub config: PathBuf,
    pub out_dir: PathBuf,
}

impl Fixture {
    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join("report.html")
    }

    pub fn read_report(&self) -> String {
        fs::read_to_string(self.report_path()).expect("report should have been written")
    }

    /// The tool command line as it appears in the settings file.
    pub fn tool_command(&self) -> String {
        format!("'{}'", self.tool.display())
    }
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self {
            bundle_name: "MyApp.xcresult".to_string(),
            version_ok: true,
            summary: None,
            tree: None,
            manifest: None,
            files: Vec::new(),
            export: ExportMode::Normal,
        }
    }

    pub fn bundle_name(mut self, name: &str) -> Self {
        self.bundle_name = name.to_string();
        self
    }

    pub fn tool_unavailable(mut self) -> Self {
        self.version_ok = false;
        self
    }

    pub fn summary(mut self, json: &str) -> Self {
        self.summary = Some(json.to_string());
        self
    }

    pub fn tree(mut self, json: &str) -> Self {
        self.tree = Some(json.to_string());
        self
    }

    pub fn manifest(mut self, json: &str) -> Self {
        self.manifest = Some(json.to_string());
        self
    }

    pub fn file(mut self, name: &str, bytes: &[u8]) -> Self {
        self.files.push((name.to_string(), bytes.to_vec()));
        self
    }

    pub fn export(mut self, mode: ExportMode) -> Self {
        self.export = mode;
        self
    }

    pub fn build(self) -> Fixture {
        let root = tempdir().expect("Failed to create temporary directory");
        let base = root.path();

        let bundle = base.join(&self.bundle_name);
        fs::create_dir_all(&bundle).expect("Failed to create bundle directory");

        let fixtures = base.join("fixtures");
        let exported = fixtures.join("exported");
        fs::create_dir_all(&exported).expect("Failed to create fixtures directory");
        if let Some(summary) = &self.summary {
            fs::write(fixtures.join("summary.json"), summary).unwrap();
        }
        if let Some(tree) = &self.tree {
            fs::write(fixtures.join("tests.json"), tree).unwrap();
        }
        if let Some(manifest) = &self.manifest {
            fs::write(exported.join("manifest.json"), manifest).unwrap();
        }
        for (name, bytes) in &self.files {
            fs::write(exported.join(name), bytes).unwrap();
        }

        let tool = base.join("fake-xcresulttool");
        write_script(&tool, &self.script(&fixtures));

        let out_dir = base.join("out");
        fs::create_dir_all(&out_dir).unwrap();

        let config = base.join("settings.toml");
        let export_timeout = if self.export == ExportMode::Hang { 1 } else { 30 };
        fs::write(
            &config,
            format!(
                "tool = \"'{}'\"\ncheck_timeout_secs = 5\nquery_timeout_secs = 5\nexport_timeout_secs = {}\n",
                tool.display(),
                export_timeout
            ),
        )
        .unwrap();

        Fixture {
            root,
            bundle,
            tool,
            config,
            out_dir,
        }
    }

    fn script(&self, fixtures: &Path) -> String {
        let version = if self.version_ok {
            "echo 'xcresulttool version 23021'; exit 0"
        } else {
            "echo 'xcrun: error: unable to find utility \"xcresulttool\"' >&2; exit 72"
        };
        let export = match self.export {
            ExportMode::Normal => "cp -R \"$F/exported/.\" \"$6\"; exit 0",
            ExportMode::NoAttachments => "echo 'Error: No attachments found' >&2; exit 1",
            ExportMode::Fail => "echo 'Error: export failed' >&2; exit 1",
            ExportMode::Hang => "exec sleep 30",
        };
        format!(
            r#"#!/bin/sh
F='{fixtures}'
case "$1" in
  version)
    {version}
    ;;
  get)
    if [ -f "$F/$3.json" ]; then cat "$F/$3.json"; exit 0; fi
    echo "Error: cannot read $3" >&2
    exit 1
    ;;
  export)
    {export}
    ;;
esac
exit 64
"#,
            fixtures = fixtures.display(),
        )
    }
}

#[cfg(unix)]
fn write_script(path: &Path, content: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, content).expect("Failed to write fake tool");
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

#[cfg(not(unix))]
fn write_script(path: &Path, content: &str) {
    fs::write(path, content).expect("Failed to write fake tool");
}

/// Two cases under one suite: `testLogin()` passed in 0.5 s and
/// `testLogout()` failed in 1.2 s with one failure message.
pub const SCENARIO_A_TREE: &str = r#"{
  "testNodes": [
    {
      "name": "MyApp",
      "nodeType": "Test Plan",
      "result": "Failed",
      "children": [
        {
          "name": "MyAppTests",
          "nodeType": "Unit test bundle",
          "result": "Failed",
          "children": [
            {
              "name": "LoginTests",
              "nodeType": "Test Suite",
              "nodeIdentifier": "LoginTests",
              "result": "Failed",
              "children": [
                {
                  "nodeIdentifier": "LoginTests/testLogin()",
                  "name": "testLogin()",
                  "nodeType": "Test Case",
                  "result": "Passed",
                  "duration": "0.5s",
                  "durationInSeconds": 0.5
                },
                {
                  "nodeIdentifier": "LoginTests/testLogout()",
                  "name": "testLogout()",
                  "nodeType": "Test Case",
                  "result": "Failed",
                  "duration": "1.2s",
                  "durationInSeconds": 1.2,
                  "children": [
                    {
                      "name": "LoginTests.swift:42: XCTAssertTrue failed",
                      "nodeType": "Failure Message",
                      "result": "Failed"
                    }
                  ]
                }
              ]
            }
          ]
        }
      ]
    }
  ],
  "devices": [
    {
      "deviceId": "00008110-001",
      "deviceName": "iPhone 15 Pro",
      "modelName": "iPhone 15 Pro",
      "platform": "iOS Simulator",
      "osVersion": "17.2",
      "architecture": "arm64"
    }
  ],
  "testPlanConfigurations": [
    { "configurationId": "1", "configurationName": "Test Scheme Action" }
  ]
}"#;

pub const SCENARIO_A_SUMMARY: &str = r#"{
  "title": "Test - MyApp",
  "startTime": 1700000000.0,
  "finishTime": 1700000125.3,
  "totalTestCount": 2,
  "passedTests": 1,
  "failedTests": 1,
  "skippedTests": 0,
  "expectedFailures": 0,
  "result": "Failed",
  "testFailures": [
    {
      "testName": "testLogout()",
      "targetName": "MyAppTests",
      "failureText": "XCTAssertTrue failed"
    }
  ]
}"#;

/// One failure screenshot for `testLogout()`.
pub const SCENARIO_B_MANIFEST: &str = r#"[
  {
    "testIdentifier": "LoginTests/testLogout()",
    "attachments": [
      {
        "exportedFileName": "shot.png",
        "suggestedHumanReadableName": "Logout failure",
        "isAssociatedWithFailure": true,
        "timestamp": 1700000050.0
      }
    ]
  }
]"#;

/// PNG signature bytes; the content is never decoded.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub fn scenario_a() -> FixtureBuilder {
    FixtureBuilder::new()
        .summary(SCENARIO_A_SUMMARY)
        .tree(SCENARIO_A_TREE)
}
