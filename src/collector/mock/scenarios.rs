//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` and `/sys` trees plus vendor
//! databases for testing collection end to end.

use super::filesystem::MockFs;

/// Default location of the PCI vendor database in scenarios.
pub const PCI_IDS_PATH: &str = "/usr/share/misc/pci.ids";
/// Default location of the USB vendor database in scenarios.
pub const USB_IDS_PATH: &str = "/usr/share/misc/usb.ids";

impl MockFs {
    /// Creates a bare host: `/proc` and `/sys` exist but hold nothing.
    pub fn bare_host() -> Self {
        let mut fs = Self::new();
        fs.add_dir("/proc");
        fs.add_dir("/sys");
        fs
    }

    /// Creates a typical two-core server with disks, mounts, RAID, NICs,
    /// a laptop battery and a wireless link.
    pub fn typical_host() -> Self {
        let mut fs = Self::bare_host();

        fs.add_file(
            "/proc/version",
            "Linux version 6.1.0-18-amd64 (debian-kernel@lists.debian.org) (gcc-12 (Debian 12.2.0-14) 12.2.0, GNU ld (GNU Binutils for Debian) 2.40) #1 SMP PREEMPT_DYNAMIC Debian 6.1.76-1 (2024-02-01)\n",
        );
        fs.add_file("/proc/sys/kernel/hostname", "box01\n");
        fs.add_file("/proc/uptime", "97245.10 380000.10\n");
        fs.add_file("/proc/loadavg", "0.10 0.20 0.30 1/200 1234\n");

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:         1024 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4194300 kB
SwapFree:        4190204 kB
Dirty:              1024 kB
HugePages_Total:       0
Hugepagesize:       2048 kB
",
        );
        fs.add_file(
            "/proc/swaps",
            "\
Filename\t\t\t\tType\t\tSize\t\tUsed\t\tPriority
/dev/sda2                               partition\t4194300\t\t4096\t\t-2
",
        );

        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 158
model name\t: Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz
cpu MHz\t\t: 3192.002
flags\t\t: fpu vme de pse

processor\t: 1
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 158
model name\t: Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz
cpu MHz\t\t: 3200.000
flags\t\t: fpu vme de pse

",
        );

        // Block devices: a fixed disk with the modern 17-field stat line,
        // an optical drive without a stat file, and a loop device without a model.
        fs.add_file("/sys/block/sda/device/model", "Samsung SSD 860\n");
        fs.add_file("/sys/block/sda/device/vendor", "ATA     \n");
        fs.add_file("/sys/block/sda/removable", "0\n");
        fs.add_file(
            "/sys/block/sda/stat",
            "   12345      100   987654     5000     6789       50   456789     3000        0     4000     8000        0        0        0        0        0        0\n",
        );
        fs.add_file("/sys/block/sr0/device/model", "DVD-RW DVR-K17\n");
        fs.add_file("/sys/block/sr0/device/vendor", "PIONEER\n");
        fs.add_file("/sys/block/sr0/removable", "1\n");
        fs.add_file("/sys/block/loop0/stat", "0 0 0 0 0 0 0 0 0 0 0\n");

        fs.add_file(
            "/proc/mounts",
            "\
/dev/sda1 / ext4 rw,relatime,errors=remount-ro 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev,size=1638400k,mode=755 0 0
/dev/sdb1 /mnt/my\\040data ext4 rw,relatime 0 0
/dev/disk/by-uuid/3f2a /boot ext2 rw,relatime 0 0
",
        );
        fs.set_disk_space("/", Some(1000), Some(250));
        fs.set_disk_space("/mnt/my data", Some(2000), None);
        fs.set_disk_space("/boot", Some(500), Some(500));
        fs.add_file("/dev/sda3", "");
        fs.add_symlink("/dev/disk/by-uuid/3f2a", "/dev/sda3");

        // PCI: two known Intel functions and one ID the database lacks.
        fs.add_file(
            "/sys/bus/pci/devices/0000:00:00.0/uevent",
            "PCI_CLASS=60000\nPCI_ID=8086:1237\nPCI_SUBSYS_ID=1AF4:1100\nPCI_SLOT_NAME=0000:00:00.0\nMODALIAS=pci:v00008086d00001237sv00001AF4sd00001100bc06sc00i00\n",
        );
        fs.add_file(
            "/sys/bus/pci/devices/0000:00:03.0/uevent",
            "DRIVER=e1000\nPCI_CLASS=20000\nPCI_ID=8086:100E\nPCI_SUBSYS_ID=8086:001E\nPCI_SLOT_NAME=0000:00:03.0\n",
        );
        fs.add_file(
            "/sys/bus/pci/devices/0000:00:04.0/uevent",
            "PCI_CLASS=88000\nPCI_ID=1234:5678\nPCI_SLOT_NAME=0000:00:04.0\n",
        );

        // USB: a receiver, the root hub and one of its interfaces.
        fs.add_file(
            "/sys/bus/usb/devices/1-1/uevent",
            "MAJOR=189\nMINOR=1\nDEVNAME=bus/usb/001/002\nDEVTYPE=usb_device\nDRIVER=usb\nPRODUCT=46d/c52b/1211\nTYPE=0/0/0\nBUSNUM=001\nDEVNUM=002\n",
        );
        fs.add_file(
            "/sys/bus/usb/devices/usb1/uevent",
            "MAJOR=189\nMINOR=0\nDEVTYPE=usb_device\nDRIVER=usb\nPRODUCT=1d6b/2/601\nTYPE=9/0/0\n",
        );
        fs.add_file(
            "/sys/bus/usb/devices/1-0:1.0/uevent",
            "DEVTYPE=usb_interface\nDRIVER=hub\nPRODUCT=1d6b/2/601\nTYPE=9/0/0\nINTERFACE=9/0/0\n",
        );

        fs.add_file(
            PCI_IDS_PATH,
            "\
#\tList of PCI ID's
#
1af4  Red Hat, Inc.
\t1000  Virtio network device
8086  Intel Corporation
\t100e  82540EM Gigabit Ethernet Controller
\t\t8086 001e  PRO/1000 MT Desktop Adapter
\t1237  440FX - 82441FX PMC [Natoma]
\t7000  82371SB PIIX3 ISA [Natoma/Triton II]
\t7010  82371SB PIIX3 IDE [Natoma/Triton II]

# List of known device classes, subclasses and programming interfaces
C 00  Unclassified device
\t00  Non-VGA unclassified device
",
        );
        fs.add_file(
            USB_IDS_PATH,
            "\
# List of USB ID's
046d  Logitech, Inc.
\tc52b  Unifying Receiver
\tc534  Unifying Receiver
1d6b  Linux Foundation
\t0001  1.1 root hub
\t0002  2.0 root hub
\t0003  3.0 root hub
",
        );

        fs.add_file(
            "/proc/mdstat",
            "\
Personalities : [raid1] [raid6] [raid5] [raid4]
md1 : active raid5 sdd1[3](S) sdc1[2] sdb1[1] sda1[0](F)
      2093056 blocks super 1.2 level 5, 512k chunk, algorithm 2 [3/2] [_UU]

md0 : active raid1 sdf1[1] sde1[0]
      1048512 blocks [2/2] [UU]

unused devices: <none>
",
        );

        fs.add_net_interface(
            "eth0",
            "up",
            "pci:v00008086d0000100Esv00008086sd0000001Ebc02sc00i00",
            (987654321, 5, 654321),
            (123456789, 2, 456789),
        );
        fs.add_net_interface("lo", "unknown", "", (12345678, 0, 9876), (12345678, 0, 9876));
        fs.add_net_interface(
            "usb0",
            "down",
            "usb:v0BDAp8153d3000dc00dsc00dp00icFFiscFFip00in00",
            (0, 0, 0),
            (0, 0, 0),
        );
        fs.add_net_interface("wlan0", "dormant", "", (100, 0, 1), (200, 0, 2));

        fs.add_file("/sys/class/power_supply/BAT0/charge_full", "5000000\n");
        fs.add_file("/sys/class/power_supply/BAT0/charge_now", "2500000\n");
        fs.add_file("/sys/class/power_supply/BAT0/manufacturer", "SMP\n");
        fs.add_file("/sys/class/power_supply/BAT0/model_name", "5B10W13930\n");
        fs.add_file("/sys/class/power_supply/BAT0/status", "Discharging\n");
        fs.add_file("/sys/class/power_supply/AC/online", "0\n");

        fs.add_file(
            "/proc/self/net/wireless",
            "\
Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
 face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
 wlan0: 0000   54.  -56.  -256        0      0      0      3      7        0
",
        );

        fs
    }

    /// Creates a host where most sources are missing or malformed.
    ///
    /// Useful for checking that every subsystem degrades independently.
    pub fn degraded_host() -> Self {
        let mut fs = Self::bare_host();

        fs.add_file("/proc/version", "FreeBSD 14.0-RELEASE\n");
        fs.add_file("/proc/loadavg", "garbage\n");
        fs.add_file("/proc/cpuinfo", "processor\t: 0\nflags\t\t: fpu\n");
        fs.add_file("/proc/mounts", "/dev/sda1 / ext4 rw 0 0\n");
        fs.add_file(
            "/proc/mdstat",
            "Personalities : [raid1]\nmd0 : inactive sdb1[1](S)\n      1048512 blocks\n\nunused devices: <none>\n",
        );
        fs.add_file("/sys/block/sda/device/model", "QEMU HARDDISK\n");
        fs.add_file("/sys/block/sda/stat", "not a stat line\n");
        fs.add_file(
            "/sys/bus/pci/devices/0000:00:01.0/uevent",
            "PCI_ID=8086:7000\n",
        );
        fs.add_file("/sys/class/power_supply/BAT1/charge_full", "0\n");
        fs.add_file("/sys/class/power_supply/BAT1/charge_now", "1000\n");

        fs
    }
}
