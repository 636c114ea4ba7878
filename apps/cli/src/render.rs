use fetchtv_core::{Device, ItemSummary, ShowRecordings};
use fetchtv_recorder::SaveReport;
use serde::Serialize;

const HEADING: &str = "[+]";

/// Console or JSON output for one invocation
///
/// Headings and progress lines are console only; JSON mode prints exactly one
/// document per result on stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

#[derive(Debug, Serialize)]
struct ShowListing<'a> {
    id: &'a str,
    title: &'a str,
    items: Vec<ItemSummary>,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn heading(&self, param: &str, value: &str) {
        if !self.json {
            println!("{}", heading_line(param, value));
        }
    }

    pub fn device(&self, device: &Device) -> serde_json::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(device)?);
        } else {
            print!("{}", device_lines(device));
        }
        Ok(())
    }

    pub fn recordings(&self, shows: &[ShowRecordings]) -> serde_json::Result<()> {
        if self.json {
            println!("{}", listing_json(shows)?);
        } else {
            self.heading("List Recordings", "");
            print!("{}", listing_lines(shows));
        }
        Ok(())
    }

    pub fn save_reports(&self, reports: &[SaveReport]) -> serde_json::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(reports)?);
        } else {
            print!("{}", report_lines(reports));
        }
        Ok(())
    }
}

fn heading_line(param: &str, value: &str) -> String {
    format!("{} {}: {}", HEADING, param, value)
}

fn item_line(text: &str, level: usize) -> String {
    format!("{} -- {}\n", "\t".repeat(level), text)
}

fn device_lines(device: &Device) -> String {
    let fields = [
        ("url", &device.url),
        ("deviceType", &device.device_type),
        ("friendlyName", &device.friendly_name),
        ("manufacturer", &device.manufacturer),
        ("manufacturerURL", &device.manufacturer_url),
        ("modelDescription", &device.model_description),
        ("modelName", &device.model_name),
        ("modelNumber", &device.model_number),
    ];

    let mut out = String::new();
    for (name, value) in fields {
        out.push_str(&item_line(&format!("{}: {}", name, value), 1));
    }
    for service in &device.services {
        out.push_str(&item_line(
            &format!("service: {} ({})", service.service_type, service.control_url),
            1,
        ));
    }
    out
}

fn listing_json(shows: &[ShowRecordings]) -> serde_json::Result<String> {
    let listing: Vec<ShowListing<'_>> = shows
        .iter()
        .map(|show| ShowListing {
            id: &show.id,
            title: &show.title,
            items: show.items.iter().map(|item| item.summary()).collect(),
        })
        .collect();
    serde_json::to_string_pretty(&listing)
}

fn listing_lines(shows: &[ShowRecordings]) -> String {
    if shows.is_empty() {
        return item_line("[!] No recordings found!", 1);
    }

    let mut out = String::new();
    for show in shows {
        out.push_str(&item_line(&show.title, 1));
        for item in &show.items {
            out.push_str(&item_line(&format!("{} ({})", item.title, item.url), 2));
        }
    }
    out
}

fn report_lines(reports: &[SaveReport]) -> String {
    if reports.is_empty() {
        return item_line("There is nothing new to record", 1);
    }

    let mut out = String::new();
    for report in reports {
        let status = if report.recorded { "Saved" } else { "Not saved" };
        out.push_str(&item_line(&format!("{}: [{}]", status, report.item.title), 1));
        if let Some(warning) = &report.warning {
            out.push_str(&item_line(&format!("[!] {}", warning), 2));
        }
        if let Some(error) = &report.error {
            out.push_str(&item_line(&format!("[!] {}", error), 2));
        }
    }
    out
}
