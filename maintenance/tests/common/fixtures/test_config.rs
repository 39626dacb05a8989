//! Test configuration builder for creating test configs programmatically

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    main_config: MainConfigBuilder,
    switch_configs: Vec<(String, SwitchConfigBuilder)>,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            main_config: MainConfigBuilder::default(),
            switch_configs: Vec::new(),
        }
    }

    pub fn with_main_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(MainConfigBuilder) -> MainConfigBuilder,
    {
        self.main_config = f(self.main_config);
        self
    }

    /// Add a switch file named `<file_name>.toml`
    pub fn with_switch<F>(mut self, file_name: &str, switch_id: &str, f: F) -> Self
    where
        F: FnOnce(SwitchConfigBuilder) -> SwitchConfigBuilder,
    {
        let builder = f(SwitchConfigBuilder::new(switch_id));
        self.switch_configs.push((file_name.to_string(), builder));
        self
    }

    /// Build and write config files to temp directory
    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        fs::write(config_dir.join("main.toml"), self.main_config.to_toml())
            .expect("Failed to write main.toml");

        for (name, builder) in &self.switch_configs {
            fs::write(config_dir.join(format!("{}.toml", name)), builder.to_toml())
                .expect("Failed to write switch config");
        }

        TestConfig {
            _temp_dir: self.temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main configuration builder
#[derive(Clone, Default)]
pub struct MainConfigBuilder {
    port: Option<u16>,
    timezone: Option<String>,
    retention_hours: Option<u32>,
    retention_schedule: Option<String>,
}

impl MainConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn timezone(mut self, timezone: &str) -> Self {
        self.timezone = Some(timezone.to_string());
        self
    }

    pub fn retention(mut self, hours: u32, schedule: &str) -> Self {
        self.retention_hours = Some(hours);
        self.retention_schedule = Some(schedule.to_string());
        self
    }

    pub fn retention_hours(mut self, hours: u32) -> Self {
        self.retention_hours = Some(hours);
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = String::new();
        if let Some(port) = self.port {
            toml.push_str(&format!("port = {}\n", port));
        }
        if let Some(timezone) = &self.timezone {
            toml.push_str(&format!("timezone = \"{}\"\n", timezone));
        }
        if let Some(hours) = self.retention_hours {
            toml.push_str(&format!("retention_hours = {}\n", hours));
        }
        if let Some(schedule) = &self.retention_schedule {
            toml.push_str(&format!("retention_schedule = \"{}\"\n", schedule));
        }
        toml
    }
}

/// Switch configuration builder
pub struct SwitchConfigBuilder {
    id: String,
    enabled: bool,
    ports: Vec<(u32, Option<String>)>,
}

impl SwitchConfigBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            enabled: true,
            ports: Vec::new(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn port(mut self, port: u32) -> Self {
        self.ports.push((port, None));
        self
    }

    pub fn named_port(mut self, port: u32, name: &str) -> Self {
        self.ports.push((port, Some(name.to_string())));
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = format!(
            r#"
[switch]
id = "{}"
enabled = {}
"#,
            self.id, self.enabled
        );

        for (port, name) in &self.ports {
            toml.push_str(&format!("\n[[interfaces]]\nport = {}\n", port));
            if let Some(name) = name {
                toml.push_str(&format!("name = \"{}\"\n", name));
            }
        }

        toml
    }
}

/// Built test configuration with temp directory
pub struct TestConfig {
    _temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestConfig {
    pub fn config_dir_string(&self) -> String {
        self.config_dir.to_string_lossy().to_string()
    }
}
