use consent_banner::config::BannerOptions;
use consent_banner::ConsentBanner;

fn main() {
    env_logger::init();

    // Configure the banner through the options layer. Anything left unset
    // falls back to the built-in defaults (the standard four categories,
    // a 30 day TTL, the "cookieControlPrefs" cookie).
    let options = BannerOptions::new()
        .title("Cookies & privacy")
        .delay(0.0)
        .expires(30.0);

    // Build the banner. With a zero delay and no consent on file it renders
    // immediately (headless here: no presenter was supplied).
    let mut banner = ConsentBanner::builder()
        .options(options)
        .subscribe(|ev| println!("notification: {ev}"))
        .build();

    println!("state after init: {}", banner.state());

    // The host UI would wire its controls to these entry points. Simulate a
    // user opening the detail list and rejecting marketing cookies.
    banner.customize();
    banner.set_checked("marketing", false);
    banner.accept();

    println!("state after accept: {}", banner.state());
    println!("analytics accepted: {}", banner.preference("analytics"));
    println!("marketing accepted: {}", banner.preference("marketing"));
    println!("stored record: {:?}", banner.preferences());
}
