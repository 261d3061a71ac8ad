fn main() -> Result<(), ructe::RucteError> {
    let mut r = ructe::Ructe::from_env()?;
    r.statics()?.add_files("static")?;
    r.compile_templates("templates")
}
