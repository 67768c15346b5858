//! Built-in BIN table of Iranian banks.

/// `(BIN, display name)` pairs compiled into the crate.
pub const IRANIAN_BANKS: &[(&str, &str)] = &[
    ("603799", "بانک ملی"),
    ("603770", "بانک صادرات"),
    ("603769", "بانک کشاورزی"),
    ("589210", "بانک سپه"),
    ("610433", "بانک ملت"),
    ("628023", "بانک مسکن"),
    ("627648", "بانک توسعه صادرات"),
    ("627961", "بانک صنعت و معدن"),
    ("627353", "بانک تجارت"),
    ("589463", "بانک رفاه"),
    ("639347", "بانک پاسارگاد"),
    ("627412", "بانک اقتصاد نوین"),
    ("622106", "بانک پارسیان"),
    ("627488", "بانک کارآفرین"),
    ("621986", "بانک سامان"),
    ("639346", "بانک سینا"),
    ("639607", "بانک سرمایه"),
    ("502806", "بانک شهر"),
    ("502938", "بانک دی"),
    ("627381", "بانک انصار"),
    ("639599", "بانک قوامین"),
];
