use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let now = time::OffsetDateTime::now_utc();
    let format = time::format_description::parse(
        "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero] UTC",
    )?;
    let stamp = now.format(&format)?;
    println!("cargo:rustc-env=TWENTYQ_BUILD_DATE={}", stamp);
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
