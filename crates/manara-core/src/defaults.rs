//! Built-in documents
//!
//! Served when nothing has been persisted yet, and restored by
//! `ContentStore::reset_to_default`.

use crate::models::{
    About, Achievement, Contact, Design, Features, Hero, ItemId, Layout, NavItem, Seo, Service,
    SiteContent, SiteInfo, SiteSettings, SocialMedia, Stat, Theme, ThemeColors, ThemeFonts,
    ThemeGradients, WisdomQuote,
};

const NAME: &str = "الشيخ عاصم فايد";
const TAGLINE: &str = "معلم ومحفظ القرآن الكريم - خريج الأزهر الشريف";
const SUMMARY: &str =
    "رحلة في تعليم وتحفيظ القرآن الكريم - دروس قرآنية أصيلة من خريج الأزهر الشريف";

fn s(value: &str) -> String {
    value.to_string()
}

fn achievement(id: u64, title: &str, description: &str, icon: &str) -> Achievement {
    Achievement {
        id: ItemId(id),
        title: s(title),
        description: s(description),
        icon: s(icon),
    }
}

fn stat(value: &str, label: &str, icon: &str) -> Stat {
    Stat {
        value: s(value),
        label: s(label),
        icon: s(icon),
    }
}

fn service(
    id: u64,
    title: &str,
    description: &str,
    features: [&str; 4],
    icon: &str,
    color: &str,
) -> Service {
    Service {
        id: ItemId(id),
        title: s(title),
        description: s(description),
        features: features.iter().map(|f| s(f)).collect(),
        icon: s(icon),
        color: s(color),
    }
}

fn quote(id: u64, arabic: &str, translation: &str, source: &str) -> WisdomQuote {
    WisdomQuote {
        id: ItemId(id),
        arabic: s(arabic),
        translation: s(translation),
        source: s(source),
    }
}

fn nav(name: &str, path: &str, icon: &str) -> NavItem {
    NavItem {
        name: s(name),
        path: s(path),
        icon: s(icon),
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            site: SiteInfo {
                title: s(NAME),
                subtitle: s(TAGLINE),
                description: s(SUMMARY),
            },
            hero: Hero {
                title: s(NAME),
                subtitle: s(TAGLINE),
                description: s(SUMMARY),
                cta_text: s("تواصل معنا"),
                background_image: s("/images/hero-bg.jpg"),
            },
            about: About {
                title: s(NAME),
                subtitle: s("معلم ومحفظ القرآن الكريم"),
                description: s("درست بالأزهر الشريف منذ نعومة أظافرى وحفظت القرآن الكريم فى سن صغيرة والتحقت بكلية اللغة العربية بجامعة الأزهر فرع المنصورة وحصلت على درجة الليسانس ثم حصلت على دبلوم العلوم الشرعية بأكاديمية زاد بالمملكة العربية السعودية وشرفنى الله بإمامة العديد من المساجد وأعمل كمعلم ومحفظ للقرآن الكريم"),
                achievements: vec![
                    achievement(
                        1,
                        "التعليم بالأزهر الشريف",
                        "درست بالأزهر الشريف منذ نعومة أظافرى وحفظت القرآن الكريم فى سن صغيرة",
                        "🕌",
                    ),
                    achievement(
                        2,
                        "ليسانس اللغة العربية",
                        "حاصل على درجة الليسانس من كلية اللغة العربية بجامعة الأزهر فرع المنصورة",
                        "🎓",
                    ),
                    achievement(
                        3,
                        "دبلوم العلوم الشرعية",
                        "حصلت على دبلوم العلوم الشرعية من أكاديمية زاد بالمملكة العربية السعودية",
                        "📜",
                    ),
                    achievement(
                        4,
                        "إمامة المساجد",
                        "شرفنى الله بإمامة العديد من المساجد والقيام بالواجبات الدينية",
                        "🕋",
                    ),
                    achievement(
                        5,
                        "تعليم وتحفيظ القرآن",
                        "أعمل كمعلم ومحفظ للقرآن الكريم لنشر تعاليم الإسلام",
                        "📖",
                    ),
                ],
                stats: vec![
                    stat("25+", "سنة من التدريس", "📚"),
                    stat("5000+", "طالب تخرج", "👥"),
                    stat("50+", "شهادة وإجازة", "🏆"),
                    stat("100+", "محاضرة", "⭐"),
                ],
            },
            services: vec![
                service(
                    1,
                    "تحفيظ القرآن الكريم",
                    "برامج تحفيظ متدرجة للأطفال والكبار مع المتابعة والمراجعة المستمرة",
                    ["تحفيظ متدرج", "مراجعة مستمرة", "متابعة فردية", "شهادات معتمدة"],
                    "📖",
                    "from-emerald-600 to-teal-600",
                ),
                service(
                    2,
                    "تفسير القرآن الكريم",
                    "دروس تفسير معاصرة تربط بين الآيات والحياة العملية",
                    ["تفسير مبسط", "أمثلة معاصرة", "ربط بالواقع", "دروس تفاعلية"],
                    "💡",
                    "from-blue-600 to-indigo-600",
                ),
                service(
                    3,
                    "دروس العلوم الشرعية",
                    "تعليم أساسيات العلوم الشرعية والفقه الإسلامي",
                    ["فقه مبسط", "أحكام عملية", "أدلة شرعية", "فتاوى معاصرة"],
                    "🕌",
                    "from-purple-600 to-pink-600",
                ),
            ],
            wisdom_quotes: vec![
                quote(
                    1,
                    "﴿ وَهُوَ الَّذِي خَلَقَ السَّمَاوَاتِ وَالْأَرْضَ بِالْحَقِّ ﴾",
                    "وهو الذي خلق السماوات والأرض بالحق",
                    "سورة الأنعام - الآية 73",
                ),
                quote(
                    2,
                    "﴿ وَجَعَلْنَا مِنَ الْمَاءِ كُلَّ شَيْءٍ حَيٍّ ﴾",
                    "وجعلنا من الماء كل شيء حي",
                    "سورة الأنبياء - الآية 30",
                ),
                quote(
                    3,
                    "﴿ وَالسَّمَاءَ بَنَيْنَاهَا بِأَيْدٍ وَإِنَّا لَمُوسِعُونَ ﴾",
                    "والسماء بنيناها بأيد وإنا لموسعون",
                    "سورة الذاريات - الآية 47",
                ),
            ],
            contact: Contact {
                phone: s("+20 100 000 0000"),
                email: s("info@sheikhassem.com"),
                address: s("القاهرة، مصر"),
                whatsapp: s("https://wa.me/201000000000"),
                social_media: SocialMedia {
                    youtube: s("https://youtube.com/@sheikhassem"),
                    facebook: s("https://facebook.com/sheikhassem"),
                    telegram: s("https://t.me/sheikhassem"),
                },
            },
            navigation: vec![
                nav("الرئيسية", "/", "BookOpen"),
                nav("عن الشيخ", "/about", "User"),
                nav("الخدمات", "/services", "Settings"),
                nav("تواصل معنا", "/contact", "Phone"),
            ],
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            theme: Theme {
                colors: ThemeColors {
                    primary: s("#fbbf24"),
                    secondary: s("#059669"),
                    accent: s("#1e3a8a"),
                    background: s("#0f172a"),
                    text: s("#ffffff"),
                    muted: s("#64748b"),
                },
                fonts: ThemeFonts {
                    arabic: s("Cairo"),
                    decorative: s("Amiri"),
                    body: s("Cairo"),
                },
                gradients: ThemeGradients {
                    primary: s("from-gold-400 via-emerald-500 to-blue-500"),
                    hero: s("from-gray-900 via-blue-900 to-purple-900"),
                    card: s("from-white/10 to-white/5"),
                },
            },
            layout: Layout {
                direction: s("rtl"),
                header_style: s("centered"),
                footer_style: s("detailed"),
                show_scroll_indicator: true,
                show_floating_elements: true,
                enable_animations: true,
                animation_speed: s("normal"),
            },
            design: Design {
                background_type: s("cosmic"),
                enable_particles: true,
                enable_floating_elements: true,
                border_radius: s("rounded-3xl"),
                spacing: s("spacious"),
            },
            seo: Seo {
                meta_title: s("الشيخ عاصم فايد - معلم ومحفظ القرآن الكريم - خريج الأزهر الشريف"),
                meta_description: s("تعلم وحفظ القرآن الكريم مع الشيخ عاصم فايد، خريج الأزهر الشريف وحاصل على دبلوم العلوم الشرعية"),
                keywords: [
                    "القرآن الكريم",
                    "تحفيظ القرآن",
                    "التفسير",
                    "الشيخ عاصم فايد",
                    "الأزهر الشريف",
                    "العلوم الشرعية",
                ]
                .iter()
                .map(|k| s(k))
                .collect(),
                og_image: s("/images/og-image.jpg"),
            },
            features: Features {
                admin_mode: false,
                live_edit: false,
                dark_mode: false,
                analytics: false,
            },
        }
    }
}
