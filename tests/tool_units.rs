// tests/tool_units.rs
mod common;
use crate::common::{init_tracing, ConfigFileBuilder, TestKit, ToolConfigBuilder, HOME, SOLUTION_ROOT};

use std::path::{Path, PathBuf};

use toolstrap::config::ConfigFile;
use toolstrap::dag::{DependencyUnit, EnvOp, Environment};
use toolstrap::exec::CommandOutput;
use toolstrap::tools::emsdk::search_paths;
use toolstrap::tools::git::parse_git_version;
use toolstrap::tools::msvc::msbuild_candidates;
use toolstrap::tools::premake::default_download_url;
use toolstrap::tools::{EmsdkUnit, GccMakeUnit, GitUnit, MsvcUnit, PremakeUnit, TracyUnit};
use toolstrap::types::HostOs;
use toolstrap_test_utils::fake_fetcher::FakeFetcher;

fn vendor(rel: &str) -> PathBuf {
    Path::new(SOLUTION_ROOT).join("vendor").join(rel)
}

// ---------- premake ----------

#[test]
fn premake_provision_downloads_host_archive_and_marks_binary_executable() {
    init_tracing();
    let tk = TestKit::with_fetcher(HostOs::Linux, |fs| {
        FakeFetcher::new(fs).with_contents(&["premake5"])
    });
    let mut unit = PremakeUnit::new(tk.kit.clone(), &ConfigFile::default());
    let env = Environment::empty();

    assert!(!unit.verify(&env).is_success());
    assert!(unit.provision(&env).is_success());

    assert_eq!(
        tk.fetcher.urls(),
        vec![default_download_url(HostOs::Linux).unwrap()]
    );
    assert!(tk.fs.is_executable(vendor("premake/premake5")));
    assert!(unit.verify(&env).is_success());
    assert_eq!(unit.executable(), Some(vendor("premake/premake5")));
}

#[test]
fn premake_on_windows_uses_zip_and_exe_name() {
    let tk = TestKit::with_fetcher(HostOs::Windows, |fs| {
        FakeFetcher::new(fs).with_contents(&["premake5.exe"])
    });
    let mut unit = PremakeUnit::new(tk.kit.clone(), &ConfigFile::default());
    let env = Environment::empty();

    assert!(unit.provision(&env).is_success());

    let url = &tk.fetcher.urls()[0];
    assert!(url.ends_with("premake-5.0.0-beta6-windows.zip"), "{url}");
    assert!(unit.verify(&env).is_success());
    assert!(!tk.fs.is_executable(vendor("premake/premake5.exe")));
}

#[test]
fn premake_default_urls_per_host() {
    assert!(default_download_url(HostOs::Linux).unwrap().ends_with("-linux.tar.gz"));
    assert!(default_download_url(HostOs::MacOs).unwrap().ends_with("-macosx.tar.gz"));
    assert!(default_download_url(HostOs::Windows).unwrap().ends_with("-windows.zip"));
    assert_eq!(default_download_url(HostOs::Other), None);
}

#[test]
fn premake_url_override_from_config() {
    let tk = TestKit::with_fetcher(HostOs::Linux, |fs| {
        FakeFetcher::new(fs).with_contents(&["premake5"])
    });
    let cfg = ConfigFileBuilder::new()
        .with_tool(
            "premake",
            ToolConfigBuilder::new()
                .url("https://mirror.example.com/premake.tar.gz")
                .build(),
        )
        .build();
    let mut unit = PremakeUnit::new(tk.kit.clone(), &cfg);

    assert!(unit.provision(&Environment::empty()).is_success());
    assert_eq!(tk.fetcher.urls(), vec!["https://mirror.example.com/premake.tar.gz"]);
}

#[test]
fn premake_download_failure_is_reported_not_raised() {
    let tk = TestKit::with_fetcher(HostOs::Linux, |fs| FakeFetcher::new(fs).offline());
    let mut unit = PremakeUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.provision(&Environment::empty()).is_success());
}

#[test]
fn premake_archive_without_binary_fails() {
    let tk = TestKit::with_fetcher(HostOs::Linux, |fs| {
        FakeFetcher::new(fs).with_contents(&["README.md"])
    });
    let mut unit = PremakeUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.provision(&Environment::empty()).is_success());
}

#[test]
fn premake_on_unsupported_host_does_not_download() {
    let tk = TestKit::new(HostOs::Other);
    let mut unit = PremakeUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.provision(&Environment::empty()).is_success());
    assert!(tk.fetcher.urls().is_empty());
}

// ---------- tracy ----------

#[test]
fn tracy_is_only_installed_on_windows() {
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = TracyUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.verify(&Environment::empty()).is_success());
    assert!(!unit.provision(&Environment::empty()).is_success());
    assert!(tk.fetcher.urls().is_empty());
}

#[test]
fn tracy_windows_install_unpacks_profiler() {
    let tk = TestKit::with_fetcher(HostOs::Windows, |fs| {
        FakeFetcher::new(fs).with_contents(&["tracy-profiler.exe"])
    });
    let mut unit = TracyUnit::new(tk.kit.clone(), &ConfigFile::default());
    let env = Environment::empty();

    assert!(unit.provision(&env).is_success());
    assert!(unit.verify(&env).is_success());
    assert!(tk.fetcher.urls()[0].ends_with("windows-0.12.2.zip"));
    assert_eq!(unit.prerequisites(), ["git".to_string()]);
}

// ---------- emsdk ----------

#[test]
fn emsdk_env_var_short_circuits_search() {
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &ConfigFile::default());
    let env = Environment::from_vars([("EMSDK", "/already/active")]);

    let outcome = unit.verify(&env);

    assert!(outcome.is_success());
    assert!(outcome.env().is_empty());
}

#[test]
fn emsdk_found_in_home_reports_activation_env() {
    let tk = TestKit::new(HostOs::Linux);
    let root = Path::new(HOME).join("emsdk");
    tk.fs.add_dir(root.join("upstream").join("emscripten"));
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &ConfigFile::default());

    let outcome = unit.verify(&Environment::empty());
    assert!(outcome.is_success());

    let mut env = Environment::empty();
    env.apply(outcome.env());
    assert_eq!(env.get("EMSDK").map(PathBuf::from), Some(root.clone()));
    assert_eq!(
        env.search_path().first(),
        Some(&root.join("upstream").join("emscripten"))
    );
}

#[test]
fn emsdk_configured_search_paths_win() {
    let tk = TestKit::new(HostOs::Linux);
    tk.fs.add_dir("/custom/emsdk/upstream/emscripten");
    tk.fs.add_dir(Path::new(HOME).join("emsdk/upstream/emscripten"));
    let cfg = ConfigFileBuilder::new()
        .with_tool("emsdk", ToolConfigBuilder::new().search_path("/custom/emsdk").build())
        .build();
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &cfg);

    let outcome = unit.verify(&Environment::empty());

    assert!(outcome.env().ops().contains(&EnvOp::Set {
        key: "EMSDK".to_string(),
        value: "/custom/emsdk".to_string(),
    }));
}

#[test]
fn emsdk_search_order() {
    let paths = search_paths(Some(Path::new("/h")), &[PathBuf::from("/cfg")]);

    assert_eq!(paths[0], PathBuf::from("/cfg"));
    assert_eq!(paths[1], Path::new("/h").join("emsdk"));
    assert!(paths.contains(&PathBuf::from("/opt/emsdk")));
    assert_eq!(search_paths(None, &[]).len(), 4);
}

#[test]
fn emsdk_missing_everywhere_fails_verify() {
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.verify(&Environment::empty()).is_success());
}

#[test]
fn emsdk_provision_clones_installs_and_activates() {
    init_tracing();
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &ConfigFile::default());

    let outcome = unit.provision(&Environment::empty());

    assert!(outcome.is_success());
    let install_dir = Path::new(HOME).join("emsdk");
    assert_eq!(
        tk.runner.command_lines(),
        vec![
            format!(
                "git clone https://github.com/emscripten-core/emsdk.git {}",
                install_dir.display()
            ),
            "emsdk install latest".to_string(),
            "emsdk activate latest".to_string(),
        ]
    );
    assert_eq!(tk.runner.calls()[1].cwd.as_deref(), Some(install_dir.as_path()));

    let mut env = Environment::empty();
    env.apply(outcome.env());
    assert_eq!(env.get("EMSDK").map(PathBuf::from), Some(install_dir.clone()));
}

#[test]
fn emsdk_provision_uses_bat_script_on_windows() {
    let tk = TestKit::new(HostOs::Windows);
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(unit.provision(&Environment::empty()).is_success());
    assert_eq!(tk.runner.programs()[1], "emsdk.bat");
}

#[test]
fn emsdk_provision_stops_when_clone_fails() {
    let tk = TestKit::new(HostOs::Linux);
    tk.runner.fail("git", 128);
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &ConfigFile::default());

    let outcome = unit.provision(&Environment::empty());

    assert!(!outcome.is_success());
    assert!(outcome.env().is_empty());
    assert_eq!(tk.runner.calls().len(), 1);
}

#[test]
fn emsdk_provision_needs_a_home_directory() {
    let tk = TestKit::new(HostOs::Linux).without_home();
    let mut unit = EmsdkUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.provision(&Environment::empty()).is_success());
    assert!(tk.runner.calls().is_empty());
}

// ---------- gccmake ----------

#[test]
fn gccmake_without_make_on_path_fails_and_cannot_install() {
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = GccMakeUnit::new(tk.kit.clone(), &ConfigFile::default());
    let env = Environment::empty();

    assert!(!unit.verify(&env).is_success());
    assert!(!unit.provision(&env).is_success());
    assert!(tk.runner.calls().is_empty());
}

#[test]
fn gccmake_has_instructions_for_every_host() {
    for host in [HostOs::Windows, HostOs::Linux, HostOs::MacOs, HostOs::Other] {
        assert!(!GccMakeUnit::instructions(host).is_empty());
    }
}

#[cfg(unix)]
#[test]
fn gccmake_finds_make_on_environment_path() {
    use std::os::unix::fs::PermissionsExt;
    use toolstrap::dag::EnvDelta;

    let dir = tempfile::tempdir().unwrap();
    let make = dir.path().join("make");
    std::fs::write(&make, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&make, std::fs::Permissions::from_mode(0o755)).unwrap();

    let tk = TestKit::new(HostOs::Linux);
    let mut unit = GccMakeUnit::new(tk.kit.clone(), &ConfigFile::default());
    let mut env = Environment::empty();
    env.apply(&EnvDelta::new().prepend_path(dir.path()));

    assert!(unit.verify(&env).is_success());
}

// ---------- git ----------

#[test]
fn git_version_is_parsed_from_common_outputs() {
    assert_eq!(
        parse_git_version("git version 2.43.0.windows.1"),
        Some("2.43.0".to_string())
    );
    assert_eq!(
        parse_git_version("git version 2.39.3 (Apple Git-146)"),
        Some("2.39.3".to_string())
    );
    assert_eq!(parse_git_version("git version 2.1"), Some("2.1".to_string()));
    assert_eq!(parse_git_version("command not found"), None);
}

#[test]
fn git_missing_from_path_fails_verify_without_running_anything() {
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = GitUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.verify(&Environment::empty()).is_success());
    assert!(tk.runner.calls().is_empty());
    assert!(unit.prerequisites().is_empty());
}

#[test]
fn git_on_unsupported_host_is_not_installed() {
    let tk = TestKit::new(HostOs::Other);
    let mut unit = GitUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.provision(&Environment::empty()).is_success());
    assert!(tk.runner.calls().is_empty());
}

#[test]
fn git_linux_without_package_manager_fails() {
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = GitUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.provision(&Environment::empty()).is_success());
    assert!(tk.runner.calls().is_empty());
}

#[test]
fn git_macos_tries_xcode_select_first() {
    let tk = TestKit::new(HostOs::MacOs);
    let mut unit = GitUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(unit.provision(&Environment::empty()).is_success());
    assert_eq!(tk.runner.command_lines(), vec!["xcode-select --install"]);
}

#[cfg(unix)]
#[test]
fn git_linux_installs_with_first_available_package_manager() {
    use std::os::unix::fs::PermissionsExt;
    use toolstrap::dag::EnvDelta;

    let dir = tempfile::tempdir().unwrap();
    for tool in ["dnf", "git"] {
        let path = dir.path().join(tool);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    let mut env = Environment::empty();
    env.apply(&EnvDelta::new().prepend_path(dir.path()));

    let tk = TestKit::new(HostOs::Linux);
    tk.runner.respond("git", CommandOutput::ok("git version 2.45.1\n"));
    let mut unit = GitUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(unit.provision(&env).is_success());
    assert_eq!(tk.runner.command_lines(), vec!["sudo dnf install -y git"]);

    assert!(unit.verify(&env).is_success());
    assert_eq!(tk.runner.programs().last().map(String::as_str), Some("git"));
}

#[cfg(unix)]
#[test]
fn git_that_fails_to_run_is_not_present() {
    use std::os::unix::fs::PermissionsExt;
    use toolstrap::dag::EnvDelta;

    let dir = tempfile::tempdir().unwrap();
    let git = dir.path().join("git");
    std::fs::write(&git, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&git, std::fs::Permissions::from_mode(0o755)).unwrap();
    let mut env = Environment::empty();
    env.apply(&EnvDelta::new().prepend_path(dir.path()));

    let tk = TestKit::new(HostOs::Linux);
    tk.runner.fail("git", 1);
    let mut unit = GitUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.verify(&env).is_success());
    assert_eq!(tk.runner.command_lines(), vec!["git --version"]);
}

// ---------- msvc ----------

#[test]
fn msvc_is_never_present_off_windows() {
    let tk = TestKit::new(HostOs::Linux);
    let mut unit = MsvcUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.verify(&Environment::empty()).is_success());
    assert!(!unit.provision(&Environment::empty()).is_success());
    assert!(tk.runner.calls().is_empty());
    assert_eq!(unit.executable(), None);
}

#[test]
fn msbuild_candidates_cover_vs_installs_dotnet_and_path() {
    let env = Environment::from_vars([
        ("ProgramFiles(x86)", "/pf"),
        ("WINDIR", "/win"),
        ("PATH", "/tools"),
    ]);

    let candidates = msbuild_candidates(&env);

    let vs = Path::new("/pf").join("Microsoft Visual Studio");
    assert_eq!(candidates[0].base, vs.join("2022"));
    assert_eq!(
        candidates[0].suffix,
        Some(["MSBuild", "Current", "Bin"].iter().collect::<PathBuf>())
    );
    assert_eq!(candidates[2].base, vs.join("2017"));
    assert_eq!(candidates.last().map(|c| c.base.clone()), Some(PathBuf::from("/tools")));
    assert!(candidates.last().unwrap().suffix.is_none());
}

#[test]
fn msvc_verify_finds_tools_and_msbuild() {
    init_tracing();
    let tk = TestKit::new(HostOs::Windows);
    let env = Environment::from_vars([("ProgramFiles(x86)", "/pf"), ("WINDIR", "/win")]);

    let vswhere = Path::new("/pf").join(r"Microsoft Visual Studio\Installer\vswhere.exe");
    tk.fs.add_file(&vswhere);

    let vc_tools = Path::new("/vs/VC/Tools/MSVC/14.40/bin/Hostx64/x64");
    for tool in ["cl.exe", "link.exe", "lib.exe", "nmake.exe"] {
        tk.fs.add_file(vc_tools.join(tool));
    }
    let vswhere_name = vswhere.file_name().unwrap().to_string_lossy().into_owned();
    tk.runner.respond(
        &vswhere_name,
        CommandOutput::ok(format!("{}\n", vc_tools.join("cl.exe").display())),
    );

    let msbuild = Path::new("/pf")
        .join("Microsoft Visual Studio")
        .join("2022")
        .join("Community")
        .join("MSBuild")
        .join("Current")
        .join("Bin")
        .join("MSBuild.exe");
    tk.fs.add_file(&msbuild);

    let mut unit = MsvcUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(unit.verify(&env).is_success());
    assert_eq!(unit.executable(), Some(msbuild.clone()));
    assert_eq!(unit.msbuild_path(), Some(msbuild.as_path()));
    assert_eq!(
        tk.runner.command_lines().last().map(String::as_str),
        Some("MSBuild.exe /version")
    );
}

#[test]
fn msvc_missing_compiler_tools_fail_verify() {
    let tk = TestKit::new(HostOs::Windows);
    let env = Environment::from_vars([("ProgramFiles(x86)", "/pf")]);
    let mut unit = MsvcUnit::new(tk.kit.clone(), &ConfigFile::default());

    assert!(!unit.verify(&env).is_success());
    assert!(!unit.provision(&env).is_success());
}

#[test]
fn msbuild_candidates_match_variable_names_case_insensitively() {
    let env = Environment::from_vars([("programfiles(x86)", "/pf"), ("windir", "/win")]);

    let candidates = msbuild_candidates(&env);

    assert_eq!(candidates[0].base, Path::new("/pf").join("Microsoft Visual Studio").join("2022"));
    assert!(candidates
        .iter()
        .any(|c| c.base == Path::new("/win").join(r"Microsoft.NET\Framework64\v4.0.30319")));
    assert_eq!(env.get("WINDIR"), None);
    assert_eq!(env.get_ignore_case("WINDIR"), Some("/win"));
}
