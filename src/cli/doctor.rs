//! Environment readiness check.

use crate::renderer::chromium::find_chromium;
use anyhow::Result;
use std::process::Command;

/// Check Chromium availability and system resources.
pub async fn run() -> Result<()> {
    println!("Pagesift Doctor");
    println!("===============");
    println!();

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Check Chromium
    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => {
            println!("[!!] Chromium NOT found. Install Chrome or set PAGESIFT_CHROMIUM_PATH.")
        }
    }

    // Check available memory; headless Chromium wants some headroom
    match get_available_memory_mb() {
        Some(mb) => {
            if mb >= 256 {
                println!("[OK] Available memory: {mb}MB (>= 256MB required)");
            } else {
                println!("[!!] Available memory: {mb}MB (< 256MB, may be insufficient)");
            }
        }
        None => println!("[??] Could not determine available memory"),
    }

    println!();
    if chromium_path.is_some() {
        println!("Status: READY");
    } else {
        println!("Status: DEGRADED");
        println!("  Static scraping works; script-heavy pages need a browser.");
    }

    Ok(())
}

/// Get available memory in MB (platform-specific).
fn get_available_memory_mb() -> Option<u64> {
    #[cfg(target_os = "macos")]
    {
        let output = Command::new("sysctl")
            .args(["-n", "hw.memsize"])
            .output()
            .ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        let bytes: u64 = s.trim().parse().ok()?;
        Some(bytes / 1_048_576)
    }
    #[cfg(target_os = "linux")]
    {
        let output = Command::new("free").args(["-m"]).output().ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        for line in s.lines() {
            if line.starts_with("Mem:") {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 7 {
                    return parts[6].parse().ok();
                }
            }
        }
        None
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}
