fn main()
{
        if let Err(e) = imps::run_imps()
        {
                log::error!("{e:#}");

                // Also visible when logging never came up.
                eprintln!("imps: {e:#}");

                std::process::exit(1);
        }
}
